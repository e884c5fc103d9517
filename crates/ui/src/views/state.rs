use mcq_core::model::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The session refused an action (out-of-range option or question).
    Rejected,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Rejected => "That choice is not available for this question.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<SessionError> for ViewError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidOptionIndex { .. } | SessionError::InvalidQuestionIndex { .. } => {
                ViewError::Rejected
            }
            _ => ViewError::Unknown,
        }
    }
}
