use mcq_core::model::{AnswerSheet, Score};

/// Aggregated view of answering progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestProgress {
    pub total: usize,
    pub answered: usize,
    /// One-based position of the displayed question.
    pub position: usize,
    pub percent_complete: u8,
}

impl TestProgress {
    #[must_use]
    pub fn from_sheet(sheet: &AnswerSheet, current_index: usize) -> Self {
        let total = sheet.len();
        let answered = sheet.answered_count();
        Self {
            total,
            answered,
            position: current_index + 1,
            percent_complete: Score::from_counts(answered, total).value(),
        }
    }

    #[must_use]
    pub fn is_on_last(&self) -> bool {
        self.position == self.total
    }
}
