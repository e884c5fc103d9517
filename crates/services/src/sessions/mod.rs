mod controller;
mod progress;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use controller::{CompletionCallback, TestSessionController};
pub use progress::TestProgress;
pub use timer::{SessionTimer, SharedController, TimerGuard};
pub use workflow::TestService;
