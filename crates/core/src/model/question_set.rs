use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("question set cannot be empty")]
    Empty,

    #[error("duplicate question id {0}")]
    DuplicateId(QuestionId),

    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// Fixed, ordered collection of questions used by one test session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Build a question set, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` for an empty list and
    /// `QuestionSetError::DuplicateId` when two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuestionSetError::DuplicateId(question.id()));
            }
        }

        Ok(Self { questions })
    }

    /// The five-question computer science paper.
    ///
    /// # Errors
    ///
    /// Never fails for the bundled data; the `Result` mirrors `QuestionSet::new`.
    pub fn computer_science_sample() -> Result<Self, QuestionSetError> {
        let questions = vec![
            Question::new(
                QuestionId::new(1),
                "What is the time complexity of binary search algorithm?",
                ["O(n)", "O(log n)", "O(n²)", "O(1)"],
                1,
            )?,
            Question::new(
                QuestionId::new(2),
                "Which data structure follows LIFO principle?",
                ["Queue", "Stack", "Array", "Linked List"],
                1,
            )?,
            Question::new(
                QuestionId::new(3),
                "What does SQL stand for?",
                [
                    "Simple Query Language",
                    "Structured Query Language",
                    "Standard Query Language",
                    "System Query Language",
                ],
                1,
            )?,
            Question::new(
                QuestionId::new(4),
                "Which sorting algorithm has the best average case time complexity?",
                ["Bubble Sort", "Insertion Sort", "Quick Sort", "Selection Sort"],
                2,
            )?,
            Question::new(
                QuestionId::new(5),
                "What is the purpose of a constructor in OOP?",
                [
                    "To destroy objects",
                    "To initialize objects",
                    "To copy objects",
                    "To compare objects",
                ],
                1,
            )?,
        ];

        Self::new(questions)
    }

    /// Number of questions (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
