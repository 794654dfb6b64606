//! Shared application service layer for the turbine engine model.
//!
//! Centralizes what the command line front end needs: loading engine and
//! scenario files, building a runnable engine from them, running scenarios
//! and exporting the results.

pub mod engine_build;
pub mod error;
pub mod export;
pub mod project_service;
pub mod run_service;

// Re-export key types for convenience
pub use engine_build::{
    build_ambient, build_constants, build_curve, build_curves, build_engine, build_engine_with,
    build_run_options, build_schedule,
};
pub use error::{AppError, AppResult};
pub use export::{samples_csv, write_samples_csv};
pub use project_service::{EngineSummary, load_project, save_project, summarize, validate_project};
pub use run_service::{RecordingObserver, RunOverrides, ScenarioOutcome, run_project};
