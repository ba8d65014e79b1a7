pub mod answer;
pub mod error;
pub mod question;

// Re-export the core types to provide a clean public API.
pub use answer::{ANSWER_CONTENT_MAX_CHARS, Answer, AnswerPayload};
pub use error::CoreError;
pub use question::{Question, QuestionFilter, QuestionPayload};
