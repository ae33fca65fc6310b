pub mod error;
pub use error::{EvaluationError, OxiexecError};
pub mod types;
