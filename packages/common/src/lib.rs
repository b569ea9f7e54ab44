pub mod models;
pub mod validation;
pub mod verdict;

pub use validation::ValidationError;
pub use verdict::{ExamOutcome, ExamVerdict, PASS_MARK};
