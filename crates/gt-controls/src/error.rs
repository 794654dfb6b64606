//! Error types for rate limiter construction.

use thiserror::Error;

/// Result type for control primitive operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when building rate limiters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
