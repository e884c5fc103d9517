mod answer_sheet;
mod ids;
mod question;
mod question_set;
mod score;
mod session;
mod settings;

pub use ids::QuestionId;

pub use answer_sheet::AnswerSheet;
pub use question::{OPTION_COUNT, Question, QuestionError, option_label};
pub use question_set::{QuestionSet, QuestionSetError};
pub use score::{Performance, Score};
pub use session::{
    CompletionReason, Phase, SessionEffect, SessionError, SessionSnapshot, TestOutcome,
    TestSession, Tick,
};
pub use settings::{
    DEFAULT_DEPARTMENT, DEFAULT_TIME_BUDGET_SECS, MAX_TIME_BUDGET_SECS, TestSettings,
    TestSettingsError,
};
