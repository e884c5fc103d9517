//! Shared error types for the services crate.

use thiserror::Error;

use mcq_core::model::{QuestionSetError, TestSettingsError};

/// Errors emitted while configuring a `TestService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TestServiceError {
    #[error(transparent)]
    Settings(#[from] TestSettingsError),
    #[error(transparent)]
    QuestionSet(#[from] QuestionSetError),
}
