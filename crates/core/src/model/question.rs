use thiserror::Error;

use crate::model::ids::QuestionId;

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("expected 4 options, got {count}")]
    OptionCount { count: usize },

    #[error("option {index} cannot be empty")]
    EmptyOption { index: usize },

    #[error("correct option {index} is out of range")]
    CorrectOutOfRange { index: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question with exactly four options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: [String; OPTION_COUNT],
    correct: usize,
}

impl Question {
    /// Build a validated question.
    ///
    /// Text and options are trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text or any option is blank, when the
    /// option count is not `OPTION_COUNT`, or when `correct` does not index an option.
    pub fn new<I, S>(
        id: QuestionId,
        text: impl Into<String>,
        options: I,
        correct: usize,
    ) -> Result<Self, QuestionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let options: Vec<String> = options
            .into_iter()
            .map(|option| option.into().trim().to_string())
            .collect();
        if let Some(index) = options.iter().position(String::is_empty) {
            return Err(QuestionError::EmptyOption { index });
        }
        let count = options.len();
        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|_| QuestionError::OptionCount { count })?;

        if correct >= OPTION_COUNT {
            return Err(QuestionError::CorrectOutOfRange { index: correct });
        }

        Ok(Self {
            id,
            text,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Zero-based index of the correct option.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, selected: Option<usize>) -> bool {
        selected == Some(self.correct)
    }
}

/// Letter shown next to an option (`0 -> 'A'`).
///
/// Returns `None` past `'Z'`.
#[must_use]
pub fn option_label(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|offset| *offset < 26)
        .map(|offset| char::from(b'A' + offset))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
