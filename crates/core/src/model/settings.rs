use thiserror::Error;

/// Reference time budget: thirty minutes.
pub const DEFAULT_TIME_BUDGET_SECS: u32 = 1800;

/// Upper bound on a single attempt: four hours.
pub const MAX_TIME_BUDGET_SECS: u32 = 14_400;

pub const DEFAULT_DEPARTMENT: &str = "Computer Science";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestSettingsError {
    #[error("time budget must be between 1 and 14400 seconds, got {0}")]
    InvalidTimeBudget(u32),

    #[error("department cannot be empty")]
    EmptyDepartment,
}

/// Settings for one timed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSettings {
    time_budget_secs: u32,
    department: String,
}

impl TestSettings {
    /// Creates validated settings.
    ///
    /// # Errors
    ///
    /// Returns `TestSettingsError::InvalidTimeBudget` when the budget is zero or
    /// above `MAX_TIME_BUDGET_SECS`, and `TestSettingsError::EmptyDepartment` for a
    /// blank department.
    pub fn new(time_budget_secs: u32, department: impl Into<String>) -> Result<Self, TestSettingsError> {
        if !(1..=MAX_TIME_BUDGET_SECS).contains(&time_budget_secs) {
            return Err(TestSettingsError::InvalidTimeBudget(time_budget_secs));
        }
        let department = department.into().trim().to_string();
        if department.is_empty() {
            return Err(TestSettingsError::EmptyDepartment);
        }

        Ok(Self {
            time_budget_secs,
            department,
        })
    }

    #[must_use]
    pub fn time_budget_secs(&self) -> u32 {
        self.time_budget_secs
    }

    /// Budget rounded up to whole minutes, for display.
    #[must_use]
    pub fn time_budget_minutes(&self) -> u32 {
        self.time_budget_secs.div_ceil(60)
    }

    #[must_use]
    pub fn department(&self) -> &str {
        &self.department
    }
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            time_budget_secs: DEFAULT_TIME_BUDGET_SECS,
            department: DEFAULT_DEPARTMENT.to_string(),
        }
    }
}
