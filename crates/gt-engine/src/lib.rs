//! Real-time gas turbine engine model.
//!
//! Provides:
//! - Operating phase state machine (off, spin-up, start, run, stall, seize, trim)
//! - Spool speed lag dynamics through the shared rate limiter
//! - Thrust with afterburner and water injection, bleed and reverser
//! - Commanded fuel flow
//! - Sticky fault flags (stall, seizure, overtemperature, fire)
//! - Telemetry label/value export and an observer hook for phase and fault events
//! - Fixed-step runner for driving an engine through a control schedule
//!
//! The model is driven once per simulation frame:
//!
//! ```
//! use gt_engine::{Ambient, EngineConstants, Phase, ThrustCurves, Turbine};
//!
//! let constants = EngineConstants::new("demo", 10_000.0, 0.8, 30.0, 60.0, 100.0, 100.0);
//! let mut engine = Turbine::new(constants, ThrustCurves::constant(0.03, 1.0)).unwrap();
//! let ambient = Ambient::sea_level();
//!
//! engine.calculate(&ambient, 1.0 / 120.0);
//! assert_eq!(engine.phase(), Phase::Off);
//! ```

pub mod ambient;
pub mod constants;
pub mod error;
pub mod faults;
pub mod fuel;
pub mod observer;
pub mod phase;
pub mod sim;
pub mod telemetry;
pub mod turbine;

// Re-exports for public API
pub use ambient::Ambient;
pub use constants::{AugMethod, EngineConstants, FaultLimits, ThrustCurves};
pub use error::{EngineError, EngineResult, InitError, SimError, SimResult};
pub use faults::Fault;
pub use fuel::{FuelSupply, FuelTank, UnlimitedFuel};
pub use observer::{EngineEvent, EngineObserver, EventLog, TracingObserver};
pub use phase::Phase;
pub use sim::{
    ControlAction, ControlEvent, ControlSchedule, RunOptions, RunRecord, Sample, Trigger, run,
    run_with,
};
pub use telemetry::TelemetryColumn;
pub use turbine::{EngineState, Turbine};
