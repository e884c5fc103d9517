use std::fmt;

use mcq_core::model::{
    AnswerSheet, CompletionReason, Phase, Question, QuestionSet, SessionEffect, SessionError,
    SessionSnapshot, TestOutcome, TestSession, Tick,
};
use tokio::sync::watch;

use super::progress::TestProgress;
use crate::Clock;

/// Invoked once with the final outcome when the session finishes.
pub type CompletionCallback = Box<dyn FnMut(&TestOutcome) + Send + 'static>;

/// Owns one `TestSession` for the duration of an attempt.
///
/// Stamps transitions with the service clock, publishes the phase on a watch
/// channel so tick sources can stop, and hands the outcome to the completion
/// callback. The callback is taken out on first use, so it cannot run twice.
pub struct TestSessionController {
    session: TestSession,
    clock: Clock,
    on_complete: Option<CompletionCallback>,
    phase_tx: watch::Sender<Phase>,
}

impl TestSessionController {
    #[must_use]
    pub fn new(
        session: TestSession,
        clock: Clock,
        on_complete: impl FnMut(&TestOutcome) + Send + 'static,
    ) -> Self {
        let (phase_tx, _) = watch::channel(session.phase());
        Self {
            session,
            clock,
            on_complete: Some(Box::new(on_complete)),
            phase_tx,
        }
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        self.session.questions()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.session.current_index()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    #[must_use]
    pub fn answer_sheet(&self) -> &AnswerSheet {
        self.session.answer_sheet()
    }

    #[must_use]
    pub fn time_remaining_secs(&self) -> u32 {
        self.session.time_remaining_secs()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&TestOutcome> {
        self.session.outcome()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    #[must_use]
    pub fn progress(&self) -> TestProgress {
        TestProgress::from_sheet(self.session.answer_sheet(), self.session.current_index())
    }

    /// Watch the session phase; flips to `Finished` exactly once.
    #[must_use]
    pub fn subscribe_phase(&self) -> watch::Receiver<Phase> {
        self.phase_tx.subscribe()
    }

    //
    // ─── OPERATIONS ────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `SessionError::InvalidOptionIndex` for an option the current
    /// question does not have.
    pub fn select_answer(&mut self, option: usize) -> Result<SessionEffect, SessionError> {
        let question = self.session.current_index();
        let effect = self.session.select_answer(option).inspect_err(|err| {
            tracing::debug!(question, option, %err, "answer rejected");
        })?;
        log_effect("select_answer", effect);
        Ok(effect)
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidQuestionIndex` when `index` is out of range.
    pub fn go_to_question(&mut self, index: usize) -> Result<SessionEffect, SessionError> {
        let effect = self.session.go_to_question(index).inspect_err(|err| {
            tracing::debug!(index, %err, "navigation rejected");
        })?;
        log_effect("go_to_question", effect);
        Ok(effect)
    }

    pub fn go_next(&mut self) -> SessionEffect {
        let effect = self.session.go_next();
        log_effect("go_next", effect);
        effect
    }

    pub fn go_previous(&mut self) -> SessionEffect {
        let effect = self.session.go_previous();
        log_effect("go_previous", effect);
        effect
    }

    /// Submit the test. Only the first call scores and reports.
    pub fn finish(&mut self) -> SessionEffect {
        let at = self.clock.now();
        match self.session.finish(CompletionReason::Submitted, at) {
            Some(outcome) => {
                self.complete(&outcome);
                SessionEffect::Applied
            }
            None => {
                log_effect("finish", SessionEffect::Ignored);
                SessionEffect::Ignored
            }
        }
    }

    /// One elapsed second. Finishes the session when the budget runs out.
    pub fn tick(&mut self) -> Tick {
        let tick = self.session.tick(self.clock.now());
        if let Tick::Expired(outcome) = &tick {
            self.complete(outcome);
        }
        tick
    }

    fn complete(&mut self, outcome: &TestOutcome) {
        self.phase_tx.send_replace(Phase::Finished);
        tracing::info!(
            score = outcome.score.value(),
            correct = outcome.correct,
            answered = outcome.answered,
            total = outcome.total,
            reason = ?outcome.reason,
            "test finished"
        );
        if let Some(mut on_complete) = self.on_complete.take() {
            on_complete(outcome);
        }
    }
}

fn log_effect(operation: &'static str, effect: SessionEffect) {
    if effect == SessionEffect::Ignored {
        tracing::debug!(operation, "ignored after finish");
    }
}

impl fmt::Debug for TestSessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSessionController")
            .field("current", &self.session.current_index())
            .field("questions_len", &self.session.question_count())
            .field("answered", &self.session.answer_sheet().answered_count())
            .field("time_remaining_secs", &self.session.time_remaining_secs())
            .field("phase", &self.session.phase())
            .field("callback_pending", &self.on_complete.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
