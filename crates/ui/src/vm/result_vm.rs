use mcq_core::model::{CompletionReason, TestOutcome};

use super::time_fmt::{format_datetime, format_elapsed};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub score_label: String,
    pub performance_label: &'static str,
    pub answered_label: String,
    pub correct_label: String,
    pub reason_label: &'static str,
    pub time_taken_label: String,
    pub completed_at_label: String,
    pub timed_out: bool,
}

impl ResultVm {
    #[must_use]
    pub fn from_outcome(outcome: &TestOutcome) -> Self {
        let timed_out = outcome.reason == CompletionReason::TimeExpired;
        Self {
            score_label: outcome.score.to_string(),
            performance_label: outcome.score.performance().label(),
            answered_label: format!(
                "You answered {} out of {} questions",
                outcome.answered, outcome.total
            ),
            correct_label: format!("{} correct", outcome.correct),
            reason_label: if timed_out { "Time's up" } else { "Submitted" },
            time_taken_label: format_elapsed(outcome.started_at, outcome.completed_at),
            completed_at_label: format_datetime(outcome.completed_at),
            timed_out,
        }
    }
}
