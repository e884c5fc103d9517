use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answer_sheet::AnswerSheet;
use crate::model::question::Question;
use crate::model::question_set::QuestionSet;
use crate::model::score::Score;
use crate::model::settings::TestSettings;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Rejected session operations. State is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("option {index} is out of range (question has {option_count} options)")]
    InvalidOptionIndex { index: usize, option_count: usize },

    #[error("question {index} is out of range (test has {question_count} questions)")]
    InvalidQuestionIndex { index: usize, question_count: usize },
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Active,
    Finished,
}

/// How a session reached `Phase::Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionReason {
    Submitted,
    TimeExpired,
}

/// Whether a mutating operation was applied or absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    Applied,
    /// The session had already finished; nothing changed.
    Ignored,
}

impl SessionEffect {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Result of one countdown step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Tick {
    Counting { remaining_secs: u32 },
    /// The countdown hit zero and finished the session.
    Expired(TestOutcome),
    /// The session had already finished.
    Ignored,
}

/// Final result of a session, produced exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub score: Score,
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
    pub reason: CompletionReason,
    pub time_remaining_secs: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Read-only copy of the session state for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub current_index: usize,
    pub question_count: usize,
    pub answer_sheet: AnswerSheet,
    pub time_remaining_secs: u32,
    pub phase: Phase,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed attempt at a question set.
///
/// Starts `Active` on the first question with every answer unset and the full
/// time budget. Becomes `Finished` once, through `finish` or when `tick` runs
/// the clock down; afterwards every mutating call returns `Ignored`.
#[derive(Debug, Clone)]
pub struct TestSession {
    questions: QuestionSet,
    current: usize,
    answers: AnswerSheet,
    time_remaining_secs: u32,
    phase: Phase,
    started_at: DateTime<Utc>,
    outcome: Option<TestOutcome>,
}

impl TestSession {
    #[must_use]
    pub fn start(questions: QuestionSet, settings: &TestSettings, started_at: DateTime<Utc>) -> Self {
        let answers = AnswerSheet::unanswered(questions.len());
        Self {
            questions,
            current: 0,
            answers,
            time_remaining_secs: settings.time_budget_secs(),
            phase: Phase::Active,
            started_at,
            outcome: None,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn answer_sheet(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&TestOutcome> {
        self.outcome.as_ref()
    }

    /// Positions whose selected option matches the answer key.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.questions
            .iter()
            .zip(self.answers.iter())
            .filter(|(question, selected)| question.is_correct(*selected))
            .count()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_index: self.current,
            question_count: self.questions.len(),
            answer_sheet: self.answers.clone(),
            time_remaining_secs: self.time_remaining_secs,
            phase: self.phase,
        }
    }

    /// Record `option` for the current question, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOptionIndex` if the current question has no
    /// such option.
    pub fn select_answer(&mut self, option: usize) -> Result<SessionEffect, SessionError> {
        if self.is_finished() {
            return Ok(SessionEffect::Ignored);
        }
        let option_count = self
            .current_question()
            .map_or(0, Question::option_count);
        if option >= option_count {
            return Err(SessionError::InvalidOptionIndex {
                index: option,
                option_count,
            });
        }

        self.answers.record(self.current, option);
        Ok(SessionEffect::Applied)
    }

    /// Jump to the question at `index`. Unanswered targets are allowed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidQuestionIndex` if `index` is past the end.
    pub fn go_to_question(&mut self, index: usize) -> Result<SessionEffect, SessionError> {
        if self.is_finished() {
            return Ok(SessionEffect::Ignored);
        }
        if index >= self.questions.len() {
            return Err(SessionError::InvalidQuestionIndex {
                index,
                question_count: self.questions.len(),
            });
        }

        self.current = index;
        Ok(SessionEffect::Applied)
    }

    /// Move forward one question; stays put on the last one.
    pub fn go_next(&mut self) -> SessionEffect {
        if self.is_finished() {
            return SessionEffect::Ignored;
        }
        let last = self.questions.len().saturating_sub(1);
        self.current = (self.current + 1).min(last);
        SessionEffect::Applied
    }

    /// Move back one question; stays put on the first one.
    pub fn go_previous(&mut self) -> SessionEffect {
        if self.is_finished() {
            return SessionEffect::Ignored;
        }
        self.current = self.current.saturating_sub(1);
        SessionEffect::Applied
    }

    /// Score the sheet and close the session.
    ///
    /// Returns the outcome only on the call that performs the transition.
    pub fn finish(&mut self, reason: CompletionReason, at: DateTime<Utc>) -> Option<TestOutcome> {
        if self.is_finished() {
            return None;
        }

        let correct = self.correct_count();
        let total = self.questions.len();
        let outcome = TestOutcome {
            score: Score::from_counts(correct, total),
            correct,
            answered: self.answers.answered_count(),
            total,
            reason,
            time_remaining_secs: self.time_remaining_secs,
            started_at: self.started_at,
            completed_at: at.max(self.started_at),
        };

        self.phase = Phase::Finished;
        self.outcome = Some(outcome.clone());
        Some(outcome)
    }

    /// Advance the countdown by one second, finishing the session at zero.
    pub fn tick(&mut self, at: DateTime<Utc>) -> Tick {
        if self.is_finished() {
            return Tick::Ignored;
        }

        self.time_remaining_secs = self.time_remaining_secs.saturating_sub(1);
        if self.time_remaining_secs > 0 {
            return Tick::Counting {
                remaining_secs: self.time_remaining_secs,
            };
        }

        match self.finish(CompletionReason::TimeExpired, at) {
            Some(outcome) => Tick::Expired(outcome),
            None => Tick::Ignored,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::QuestionId;
    use crate::time::fixed_now;

    fn question_set(key: &[usize]) -> QuestionSet {
        let questions = key
            .iter()
            .enumerate()
            .map(|(i, correct)| {
                Question::new(
                    QuestionId::new(i as u64 + 1),
                    format!("Question {}", i + 1),
                    ["A", "B", "C", "D"],
                    *correct,
                )
                .unwrap()
            })
            .collect();
        QuestionSet::new(questions).unwrap()
    }

    fn session_with_budget(budget: u32) -> TestSession {
        let settings = TestSettings::new(budget, "Computer Science").unwrap();
        TestSession::start(question_set(&[1, 1, 1, 2, 1]), &settings, fixed_now())
    }

    fn session() -> TestSession {
        session_with_budget(1800)
    }

    fn answer_all(session: &mut TestSession, answers: &[usize]) {
        for (index, option) in answers.iter().enumerate() {
            session.go_to_question(index).unwrap();
            let _ = session.select_answer(*option).unwrap();
        }
    }

    #[test]
    fn starts_active_on_first_question_with_full_budget() {
        let session = session();
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.time_remaining_secs(), 1800);
        assert_eq!(session.answer_sheet().len(), 5);
        assert_eq!(session.answer_sheet().answered_count(), 0);
    }

    #[test]
    fn all_correct_scores_one_hundred() {
        let mut session = session();
        answer_all(&mut session, &[1, 1, 1, 2, 1]);
        let outcome = session.finish(CompletionReason::Submitted, fixed_now()).unwrap();
        assert_eq!(outcome.score.value(), 100);
        assert_eq!(outcome.correct, 5);
        assert_eq!(outcome.reason, CompletionReason::Submitted);
    }

    #[test]
    fn three_of_five_scores_sixty() {
        let mut session = session();
        answer_all(&mut session, &[1, 0, 1, 2, 0]);
        let outcome = session.finish(CompletionReason::Submitted, fixed_now()).unwrap();
        assert_eq!(outcome.score.value(), 60);
        assert_eq!(outcome.answered, 5);
    }

    #[test]
    fn unanswered_questions_count_as_incorrect() {
        let mut session = session();
        let _ = session.select_answer(1).unwrap();
        let outcome = session.finish(CompletionReason::Submitted, fixed_now()).unwrap();
        assert_eq!(outcome.correct, 1);
        assert_eq!(outcome.answered, 1);
        assert_eq!(outcome.score.value(), 20);
    }

    #[test]
    fn second_finish_reports_nothing() {
        let mut session = session();
        assert!(session.finish(CompletionReason::Submitted, fixed_now()).is_some());
        assert!(session.finish(CompletionReason::Submitted, fixed_now()).is_none());
        assert_eq!(
            session.outcome().map(|o| o.reason),
            Some(CompletionReason::Submitted)
        );
    }

    #[test]
    fn countdown_expiry_finishes_with_zero_score() {
        let mut session = session_with_budget(2);
        assert_eq!(
            session.tick(fixed_now()),
            Tick::Counting { remaining_secs: 1 }
        );
        let Tick::Expired(outcome) = session.tick(fixed_now()) else {
            panic!("expected expiry on second tick");
        };
        assert_eq!(outcome.score, Score::ZERO);
        assert_eq!(outcome.reason, CompletionReason::TimeExpired);
        assert_eq!(outcome.time_remaining_secs, 0);
        assert!(session.is_finished());
        assert_eq!(session.tick(fixed_now()), Tick::Ignored);
        assert_eq!(session.time_remaining_secs(), 0);
    }

    #[test]
    fn expiry_scores_answers_present_at_that_moment() {
        let mut session = session_with_budget(1);
        let _ = session.select_answer(1).unwrap();
        session.go_to_question(3).unwrap();
        let _ = session.select_answer(2).unwrap();
        let Tick::Expired(outcome) = session.tick(fixed_now()) else {
            panic!("expected expiry");
        };
        assert_eq!(outcome.correct, 2);
        assert_eq!(outcome.score.value(), 40);
    }

    #[test]
    fn reselecting_same_option_leaves_sheet_unchanged() {
        let mut session = session();
        let _ = session.select_answer(1).unwrap();
        let before = session.answer_sheet().clone();
        let _ = session.select_answer(1).unwrap();
        assert_eq!(session.answer_sheet(), &before);
    }

    #[test]
    fn reselecting_other_option_overwrites() {
        let mut session = session();
        let _ = session.select_answer(1).unwrap();
        let _ = session.select_answer(3).unwrap();
        assert_eq!(session.answer_sheet().get(0), Some(3));
        assert_eq!(session.answer_sheet().answered_count(), 1);
    }

    #[test]
    fn option_four_is_rejected_without_mutation() {
        let mut session = session();
        let err = session.select_answer(4).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidOptionIndex {
                index: 4,
                option_count: 4
            }
        );
        assert_eq!(session.answer_sheet().answered_count(), 0);
    }

    #[test]
    fn out_of_range_jump_is_rejected_not_clamped() {
        let mut session = session();
        session.go_to_question(2).unwrap();
        let err = session.go_to_question(5).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidQuestionIndex {
                index: 5,
                question_count: 5
            }
        );
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut session = session();
        let _ = session.go_previous();
        assert_eq!(session.current_index(), 0);

        session.go_to_question(4).unwrap();
        let _ = session.go_next();
        assert_eq!(session.current_index(), 4);

        let _ = session.go_previous();
        assert_eq!(session.current_index(), 3);
    }

    #[test]
    fn finished_session_ignores_every_mutation() {
        let mut session = session();
        let _ = session.select_answer(2).unwrap();
        session.go_to_question(1).unwrap();
        let _ = session.finish(CompletionReason::Submitted, fixed_now());
        let frozen = session.snapshot();

        assert_eq!(session.select_answer(1), Ok(SessionEffect::Ignored));
        assert_eq!(session.select_answer(9), Ok(SessionEffect::Ignored));
        assert_eq!(session.go_to_question(3), Ok(SessionEffect::Ignored));
        assert_eq!(session.go_to_question(99), Ok(SessionEffect::Ignored));
        assert_eq!(session.go_next(), SessionEffect::Ignored);
        assert_eq!(session.go_previous(), SessionEffect::Ignored);
        assert_eq!(session.tick(fixed_now()), Tick::Ignored);

        assert_eq!(session.snapshot(), frozen);
    }

    #[test]
    fn current_index_stays_in_bounds_across_mixed_operations() {
        let mut session = session();
        let n = session.question_count();
        for step in 0..40_usize {
            match step % 5 {
                0 => {
                    let _ = session.go_next();
                }
                1 => {
                    let _ = session.go_previous();
                }
                2 => {
                    let _ = session.go_to_question(step % 7);
                }
                3 => {
                    let _ = session.select_answer(step % 6);
                }
                _ => {
                    let _ = session.tick(fixed_now());
                }
            }
            assert!(session.current_index() < n);
            assert_eq!(session.answer_sheet().len(), n);
            assert!(
                session
                    .answer_sheet()
                    .iter()
                    .flatten()
                    .all(|option| option < 4)
            );
        }
    }

    #[test]
    fn completed_at_never_precedes_start() {
        let mut session = session();
        let earlier = fixed_now() - chrono::Duration::seconds(10);
        let outcome = session.finish(CompletionReason::Submitted, earlier).unwrap();
        assert_eq!(outcome.completed_at, outcome.started_at);
    }
}
