/// Per-question record of the selected option; `None` means unanswered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    entries: Vec<Option<usize>>,
}

impl AnswerSheet {
    /// A sheet with `len` unanswered entries.
    #[must_use]
    pub fn unanswered(len: usize) -> Self {
        Self {
            entries: vec![None; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selected option for the question at `position`, if any.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<usize> {
        self.entries.get(position).copied().flatten()
    }

    #[must_use]
    pub fn is_answered(&self, position: usize) -> bool {
        self.get(position).is_some()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.entries.iter().copied()
    }

    /// Overwrites the entry at `position`. Callers validate both indices.
    pub(crate) fn record(&mut self, position: usize, option: usize) {
        if let Some(entry) = self.entries.get_mut(position) {
            *entry = Some(option);
        }
    }
}
