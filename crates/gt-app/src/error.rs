//! Error types for the gt-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates' errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read project file: {path}")]
    ProjectFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Engine build failed: {0}")]
    Build(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gt-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<gt_project::ProjectError> for AppError {
    fn from(err: gt_project::ProjectError) -> Self {
        match err {
            gt_project::ProjectError::Validation(v) => AppError::Validation(v.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<gt_project::ValidationError> for AppError {
    fn from(err: gt_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<gt_engine::EngineError> for AppError {
    fn from(err: gt_engine::EngineError) -> Self {
        AppError::Build(err.to_string())
    }
}

impl From<gt_tables::TableError> for AppError {
    fn from(err: gt_tables::TableError) -> Self {
        AppError::Build(err.to_string())
    }
}

impl From<gt_engine::SimError> for AppError {
    fn from(err: gt_engine::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}
