//! Rate limiting primitives for the turbine engine model.
//!
//! Every smoothed quantity in the engine (spool speeds, EGT, oil temperature,
//! nozzle and inlet position, EPR) moves toward a target through the same
//! lag filter:
//!
//! - [`seek`] is the pure primitive: `new = seek(current, target, accel, decel, dt)`
//! - [`RateLimits`] bundles a validated accel/decel pair
//! - [`PositionActuator`] adds position limits for normalized geometry (nozzle, inlet)
//!
//! The filter never overshoots its target and never moves faster than the
//! rate selected for the direction of travel.

pub mod actuator;
pub mod error;
pub mod seek;

pub use actuator::{ActuatorState, PositionActuator};
pub use error::{ControlError, ControlResult};
pub use seek::{RateLimits, seek};
