use mcq_core::model::{SessionError, TestOutcome, option_label};
use mcq_core::time::format_countdown;
use services::{TestService, TestSessionController};
use tokio::sync::oneshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestIntent {
    Select(usize),
    GoTo(usize),
    Next,
    Previous,
    Finish,
}

/// One running attempt as seen by the test screen.
///
/// The outcome is read from the completion channel after every operation, so
/// it surfaces exactly once no matter which path finished the session.
pub struct TestVm {
    controller: TestSessionController,
    completion: oneshot::Receiver<TestOutcome>,
}

impl TestVm {
    #[must_use]
    pub fn start(service: &TestService) -> Self {
        let (controller, completion) = service.start_with_notifier();
        Self {
            controller,
            completion,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.controller.is_finished()
    }

    #[must_use]
    pub fn controller(&self) -> &TestSessionController {
        &self.controller
    }

    /// Apply a user intent. Returns the outcome when this intent finished the test.
    ///
    /// # Errors
    ///
    /// Returns the session error for an out-of-range option or question.
    pub fn dispatch(&mut self, intent: TestIntent) -> Result<Option<TestOutcome>, SessionError> {
        match intent {
            TestIntent::Select(option) => {
                self.controller.select_answer(option)?;
            }
            TestIntent::GoTo(index) => {
                self.controller.go_to_question(index)?;
            }
            TestIntent::Next => {
                self.controller.go_next();
            }
            TestIntent::Previous => {
                self.controller.go_previous();
            }
            TestIntent::Finish => {
                self.controller.finish();
            }
        }
        Ok(self.take_outcome())
    }

    /// One elapsed second. Returns the outcome when time ran out on this tick.
    pub fn tick(&mut self) -> Option<TestOutcome> {
        let _ = self.controller.tick();
        self.take_outcome()
    }

    fn take_outcome(&mut self) -> Option<TestOutcome> {
        self.completion.try_recv().ok()
    }

    #[must_use]
    pub fn screen(&self) -> TestScreenVm {
        let controller = &self.controller;
        let sheet = controller.answer_sheet();
        let progress = controller.progress();
        let current = controller.current_index();
        let selected = sheet.get(current);

        let (question_text, options) = controller.current_question().map_or_else(
            || (String::new(), Vec::new()),
            |question| {
                let options = question
                    .options()
                    .iter()
                    .enumerate()
                    .map(|(index, text)| OptionVm {
                        index,
                        label: option_label(index).unwrap_or('?'),
                        text: text.clone(),
                        selected: selected == Some(index),
                    })
                    .collect();
                (question.text().to_string(), options)
            },
        );

        let nav = sheet
            .iter()
            .enumerate()
            .map(|(index, answer)| NavDotVm {
                index,
                number: index + 1,
                state: if index == current {
                    NavDotState::Current
                } else if answer.is_some() {
                    NavDotState::Answered
                } else {
                    NavDotState::Unanswered
                },
            })
            .collect();

        TestScreenVm {
            position_label: format!("Question {} of {}", progress.position, progress.total),
            timer_label: format_countdown(controller.time_remaining_secs()),
            answered_label: format!("{}/{} answered", progress.answered, progress.total),
            percent_complete: progress.percent_complete,
            question_text,
            question_answered: selected.is_some(),
            options,
            nav,
            is_first: current == 0,
            is_last: progress.is_on_last(),
            can_finish: progress.answered > 0,
            finished: controller.is_finished(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestScreenVm {
    pub position_label: String,
    pub timer_label: String,
    pub answered_label: String,
    pub percent_complete: u8,
    pub question_text: String,
    pub question_answered: bool,
    pub options: Vec<OptionVm>,
    pub nav: Vec<NavDotVm>,
    pub is_first: bool,
    pub is_last: bool,
    /// Finish stays disabled until at least one answer is given.
    pub can_finish: bool,
    pub finished: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: char,
    pub text: String,
    pub selected: bool,
}

impl OptionVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.selected {
            "option option--selected"
        } else {
            "option"
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavDotState {
    Current,
    Answered,
    Unanswered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavDotVm {
    pub index: usize,
    pub number: usize,
    pub state: NavDotState,
}

impl NavDotVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self.state {
            NavDotState::Current => "nav-dot nav-dot--current",
            NavDotState::Answered => "nav-dot nav-dot--answered",
            NavDotState::Unanswered => "nav-dot",
        }
    }
}

/// Maps `1`-`4` and `a`-`d` (either case) to an option index.
#[must_use]
pub fn option_for_key(key: &str) -> Option<usize> {
    match key {
        "1" | "a" | "A" => Some(0),
        "2" | "b" | "B" => Some(1),
        "3" | "c" | "C" => Some(2),
        "4" | "d" | "D" => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcq_core::model::{CompletionReason, Score};
    use mcq_core::time::fixed_clock;

    fn vm(budget: u32) -> TestVm {
        let service = TestService::computer_science(fixed_clock(), budget, "Computer Science")
            .expect("service");
        TestVm::start(&service)
    }

    #[test]
    fn fresh_screen_shows_first_question() {
        let screen = vm(1800).screen();
        assert_eq!(screen.position_label, "Question 1 of 5");
        assert_eq!(screen.timer_label, "30:00");
        assert_eq!(screen.answered_label, "0/5 answered");
        assert_eq!(screen.percent_complete, 0);
        assert_eq!(screen.options.len(), 4);
        assert_eq!(screen.options[1].label, 'B');
        assert!(screen.is_first);
        assert!(!screen.is_last);
        assert!(!screen.can_finish);
        assert_eq!(screen.nav[0].state, NavDotState::Current);
    }

    #[test]
    fn selection_marks_option_and_nav_dot() {
        let mut vm = vm(1800);
        assert_eq!(vm.dispatch(TestIntent::Select(2)).unwrap(), None);
        assert_eq!(vm.dispatch(TestIntent::Next).unwrap(), None);

        let screen = vm.screen();
        assert_eq!(screen.nav[0].state, NavDotState::Answered);
        assert_eq!(screen.nav[1].state, NavDotState::Current);
        assert_eq!(screen.nav[2].state, NavDotState::Unanswered);
        assert!(!screen.question_answered);
        assert!(screen.can_finish);

        vm.dispatch(TestIntent::Previous).unwrap();
        let screen = vm.screen();
        assert!(screen.options[2].selected);
        assert_eq!(screen.options[2].class(), "option option--selected");
    }

    #[test]
    fn finish_surfaces_outcome_once() {
        let mut vm = vm(1800);
        for (index, option) in [1, 1, 1, 2, 1].into_iter().enumerate() {
            vm.dispatch(TestIntent::GoTo(index)).unwrap();
            vm.dispatch(TestIntent::Select(option)).unwrap();
        }
        assert!(vm.screen().is_last);

        let outcome = vm.dispatch(TestIntent::Finish).unwrap().expect("outcome");
        assert_eq!(outcome.score, Score::FULL);
        assert_eq!(vm.dispatch(TestIntent::Finish).unwrap(), None);
        assert!(vm.screen().finished);
    }

    #[test]
    fn expiry_surfaces_through_tick() {
        let mut vm = vm(2);
        assert_eq!(vm.tick(), None);
        let outcome = vm.tick().expect("expired");
        assert_eq!(outcome.reason, CompletionReason::TimeExpired);
        assert_eq!(vm.tick(), None);
        assert_eq!(vm.screen().timer_label, "0:00");
    }

    #[test]
    fn rejected_intent_is_an_error() {
        let mut vm = vm(1800);
        assert!(vm.dispatch(TestIntent::Select(4)).is_err());
        assert!(vm.dispatch(TestIntent::GoTo(9)).is_err());
        assert_eq!(vm.screen().answered_label, "0/5 answered");
    }

    #[test]
    fn keys_map_to_options() {
        assert_eq!(option_for_key("1"), Some(0));
        assert_eq!(option_for_key("d"), Some(3));
        assert_eq!(option_for_key("C"), Some(2));
        assert_eq!(option_for_key("5"), None);
        assert_eq!(option_for_key("e"), None);
    }
}
