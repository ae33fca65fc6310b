use crate::core::common::types::DataType;
use thiserror::Error;

/// Errors raised while evaluating an expression against a single tuple.
///
/// These surface out of `next()` and abort the enclosing task; nothing in the
/// operator tree catches or retries them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("Arithmetic overflow in '{op}'")]
    ArithmeticOverflow { op: String },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Function '{name}' failed: {reason}")]
    FunctionFailed { name: String, reason: String },
    #[error("Column id {column_id} is out of bounds for tuple width {width}")]
    ColumnOutOfBounds { column_id: usize, width: usize },
    #[error("Cannot cast {from} to {to}")]
    InvalidCast { from: String, to: DataType },
    #[error("Operator '{op}' cannot be applied to {left} and {right}")]
    InvalidOperands { op: String, left: DataType, right: DataType },
    #[error("Expression '{kind}' does not produce a scalar value")]
    NotScalar { kind: String },
    #[error("Extension expression failed: {0}")]
    Extension(String),
}

/// Top-level error type of the execution layer.
#[derive(Debug, Error)]
pub enum OxiexecError {
    /// A column name did not resolve against the schema.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    #[error("Ambiguous column reference: {0}")]
    AmbiguousColumn(String),
    #[error("Type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String, context: String },
    #[error("No function matches signature {signature}")]
    FunctionNotFound { signature: String },
    #[error("Invalid join keys: {0}")]
    InvalidJoinKeys(String),
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Internal Error: {0}")]
    Internal(String),
}

impl OxiexecError {
    /// Shorthand for a construction-time type mismatch.
    #[must_use]
    pub fn type_mismatch(
        expected: impl Into<String>,
        found: &DataType,
        context: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.to_string(),
            context: context.into(),
        }
    }

    /// True for errors that can only be raised while building an operator tree.
    #[must_use]
    pub const fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::ColumnNotFound(_)
                | Self::AmbiguousColumn(_)
                | Self::TypeMismatch { .. }
                | Self::FunctionNotFound { .. }
                | Self::InvalidJoinKeys(_)
                | Self::InvalidExpression(_)
        )
    }
}
