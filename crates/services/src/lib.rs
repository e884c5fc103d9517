#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use mcq_core::Clock;

pub use error::TestServiceError;
pub use sessions::{
    CompletionCallback, SessionTimer, SharedController, TestProgress, TestService,
    TestSessionController, TimerGuard,
};
