//! Error types for table construction.

use thiserror::Error;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("Table needs at least {min} breakpoints on {axis}, got {got}")]
    TooFewBreakpoints {
        axis: &'static str,
        min: usize,
        got: usize,
    },

    #[error("Breakpoints on {axis} must be strictly increasing (index {index})")]
    NotIncreasing { axis: &'static str, index: usize },

    #[error("Table shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Non-finite table entry at {what}")]
    NonFinite { what: &'static str },
}
