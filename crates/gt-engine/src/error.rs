//! Error types for engine construction and scenario runs.

use crate::faults::Fault;
use thiserror::Error;

/// Errors raised while building an engine from its constants.
///
/// Runtime faults are never errors; they are flags on the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid engine constant {field} = {value}: {reason}")]
    InvalidConstant {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Missing thrust curve: {what}")]
    MissingCurve { what: &'static str },

    #[error(transparent)]
    Core(#[from] gt_core::GtError),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Reasons `init_running` declines to place the engine in the run phase.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    #[error("no fuel available to the engine")]
    NoFuel,

    #[error("engine cannot run while {0} is latched")]
    Faulted(Fault),
}

/// Errors encountered driving an engine through a scenario.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Engine init failed: {0}")]
    Init(#[from] InitError),
}

pub type SimResult<T> = Result<T, SimError>;
