pub mod quiz_answer;
pub mod quiz_question;
pub mod structured_summary;
pub use quiz_answer::{GradedBy, QuizAnswer, QuizScore};
pub use quiz_question::{QuizCategory, QuizQuestion};
pub use structured_summary::{Medication, StructuredSummary};
