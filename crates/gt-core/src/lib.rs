//! gt-core: stable foundation for the turbine engine model.
//!
//! Contains:
//! - units (uom SI types + constructors + the imperial conversions the engine uses)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{GtError, GtResult};
pub use numeric::*;
pub use units::*;
