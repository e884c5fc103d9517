use std::fmt;

use serde::{Deserialize, Serialize};

/// Whole-number percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Score(u8);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const FULL: Score = Score(100);

    /// `round(100 * correct / total)`, rounding halves up.
    ///
    /// Integer arithmetic keeps `x.5` cases exact. `total == 0` yields zero and
    /// `correct` is capped at `total`.
    #[must_use]
    pub fn from_counts(correct: usize, total: usize) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let correct = correct.min(total) as u128;
        let total = total as u128;
        let rounded = (200 * correct + total) / (2 * total);
        Self(u8::try_from(rounded).unwrap_or(100))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn performance(self) -> Performance {
        Performance::for_score(self)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Coarse band shown next to a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Performance {
    /// 90 and above.
    Excellent,
    /// 80 to 89.
    VeryGood,
    /// 70 to 79.
    Good,
    /// Below 70.
    KeepPracticing,
}

impl Performance {
    #[must_use]
    pub fn for_score(score: Score) -> Self {
        match score.value() {
            90.. => Self::Excellent,
            80..=89 => Self::VeryGood,
            70..=79 => Self::Good,
            _ => Self::KeepPracticing,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent!",
            Self::VeryGood => "Very Good!",
            Self::Good => "Good!",
            Self::KeepPracticing => "Keep practicing!",
        }
    }
}
