//! Rate-limited position actuator for normalized engine geometry.
//!
//! Variable exhaust nozzles and inlet ramps are commanded to a normalized
//! position and slew toward it at a fixed rate:
//! - Rate limits (maximum actuation speed, separate open/close rates)
//! - Position limits ([0, 1] for geometry position)

use crate::seek::RateLimits;
use serde::{Deserialize, Serialize};

/// State of a position actuator (e.g., nozzle area).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActuatorState {
    /// Current position [0, 1]
    pub position: f64,
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self { position: 1.0 }
    }
}

/// Slew-rate limited actuator with position clamping.
///
/// # Example
///
/// ```
/// use gt_controls::{ActuatorState, PositionActuator, RateLimits};
///
/// let nozzle = PositionActuator::new(RateLimits::symmetric(0.8));
/// let mut state = ActuatorState { position: 1.0 };
///
/// for _ in 0..100 {
///     state = nozzle.step(&state, 0.01, 0.2);
/// }
///
/// // 0.8/s for one second covers the full 0.8 travel
/// assert!((state.position - 0.2).abs() < 1e-9);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionActuator {
    /// Open/close rates (1/second)
    pub limits: RateLimits,
}

impl PositionActuator {
    pub const fn new(limits: RateLimits) -> Self {
        Self { limits }
    }

    /// Advance actuator state by timestep `dt` toward `command`.
    ///
    /// The command is clamped to [0, 1] before the rate limit is applied.
    pub fn step(&self, state: &ActuatorState, dt: f64, command: f64) -> ActuatorState {
        let command = if command.is_nan() {
            state.position
        } else {
            command.clamp(0.0, 1.0)
        };
        let new_pos = self.limits.apply(state.position, command, dt);
        ActuatorState {
            position: new_pos.clamp(0.0, 1.0),
        }
    }
}
