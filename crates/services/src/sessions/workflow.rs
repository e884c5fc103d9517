use std::sync::{Arc, Mutex};

use mcq_core::model::{QuestionSet, TestOutcome, TestSession, TestSettings};
use tokio::sync::oneshot;

use super::controller::TestSessionController;
use super::timer::{SessionTimer, SharedController, TimerGuard};
use crate::Clock;
use crate::error::TestServiceError;

/// Builds test sessions from an explicit question set and settings.
#[derive(Debug, Clone)]
pub struct TestService {
    clock: Clock,
    settings: TestSettings,
    questions: Arc<QuestionSet>,
}

impl TestService {
    #[must_use]
    pub fn new(clock: Clock, settings: TestSettings, questions: QuestionSet) -> Self {
        Self {
            clock,
            settings,
            questions: Arc::new(questions),
        }
    }

    /// Service over the bundled computer science paper.
    ///
    /// # Errors
    ///
    /// Returns `TestServiceError::Settings` for an invalid budget or department.
    pub fn computer_science(
        clock: Clock,
        time_budget_secs: u32,
        department: impl Into<String>,
    ) -> Result<Self, TestServiceError> {
        let settings = TestSettings::new(time_budget_secs, department)?;
        let questions = QuestionSet::computer_science_sample()?;
        Ok(Self::new(clock, settings, questions))
    }

    #[must_use]
    pub fn settings(&self) -> &TestSettings {
        &self.settings
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Start an attempt that reports through `on_complete`.
    #[must_use]
    pub fn start_session(
        &self,
        on_complete: impl FnMut(&TestOutcome) + Send + 'static,
    ) -> TestSessionController {
        let started_at = self.clock.now();
        let session = TestSession::start((*self.questions).clone(), &self.settings, started_at);
        tracing::debug!(
            questions = self.questions.len(),
            budget_secs = self.settings.time_budget_secs(),
            department = self.settings.department(),
            "test session started"
        );
        TestSessionController::new(session, self.clock, on_complete)
    }

    /// Start an attempt whose outcome arrives on a oneshot channel.
    ///
    /// The receiver errors if the controller is dropped before finishing.
    #[must_use]
    pub fn start_with_notifier(&self) -> (TestSessionController, oneshot::Receiver<TestOutcome>) {
        let (tx, rx) = oneshot::channel();
        let mut tx = Some(tx);
        let controller = self.start_session(move |outcome| {
            if let Some(tx) = tx.take() {
                let _ = tx.send(outcome.clone());
            }
        });
        (controller, rx)
    }

    /// Start an attempt with a running countdown.
    ///
    /// Keep the guard alive for as long as the attempt is on screen.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn start_timed(
        &self,
        timer: SessionTimer,
    ) -> (SharedController, TimerGuard, oneshot::Receiver<TestOutcome>) {
        let (controller, rx) = self.start_with_notifier();
        let controller = Arc::new(Mutex::new(controller));
        let guard = timer.start(Arc::clone(&controller));
        (controller, guard, rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcq_core::model::{CompletionReason, Phase, Score};
    use mcq_core::time::{fixed_clock, fixed_now};

    fn service(budget: u32) -> TestService {
        TestService::computer_science(fixed_clock(), budget, "Computer Science").unwrap()
    }

    #[test]
    fn invalid_settings_are_reported() {
        let err = TestService::computer_science(fixed_clock(), 0, "CS").unwrap_err();
        assert!(matches!(err, TestServiceError::Settings(_)));
    }

    #[test]
    fn sessions_start_fresh_each_time() {
        let service = service(1800);
        let (mut first, _rx) = service.start_with_notifier();
        first.select_answer(2).unwrap();
        let _ = first.finish();

        let (second, _rx) = service.start_with_notifier();
        assert_eq!(second.phase(), Phase::Active);
        assert_eq!(second.answer_sheet().answered_count(), 0);
        assert_eq!(second.time_remaining_secs(), 1800);
    }

    #[test]
    fn notifier_delivers_outcome() {
        let (mut controller, mut rx) = service(1800).start_with_notifier();
        controller.select_answer(1).unwrap();
        let _ = controller.finish();

        let outcome = rx.try_recv().unwrap();
        assert_eq!(outcome.score, Score::from_counts(1, 5));
        assert_eq!(outcome.reason, CompletionReason::Submitted);
        assert_eq!(outcome.started_at, fixed_now());
    }

    #[test]
    fn abandoned_session_closes_notifier() {
        let (controller, mut rx) = service(1800).start_with_notifier();
        drop(controller);
        assert!(rx.try_recv().is_err());
    }
}
