//! The engine's lag filter.

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};

/// Advance `current` toward `target` by at most one rate-limited step.
///
/// `accel` is the rate (units per second) used when moving up, `decel` when
/// moving down. The result always lies between `current` and `target`
/// inclusive, so a large `dt` lands exactly on the target instead of
/// overshooting it.
///
/// Negative rates and negative `dt` are treated as zero (the value holds).
/// A non-finite `current` snaps to `target`.
///
/// ```
/// use gt_controls::seek;
///
/// let n2 = seek(60.0, 100.0, 30.0, 90.0, 0.1);
/// assert!((n2 - 63.0).abs() < 1e-12);
///
/// // Never overshoots
/// assert_eq!(seek(99.0, 100.0, 30.0, 90.0, 1.0), 100.0);
/// ```
pub fn seek(current: f64, target: f64, accel: f64, decel: f64, dt: f64) -> f64 {
    if !current.is_finite() {
        return target;
    }
    let dt = if dt > 0.0 { dt } else { 0.0 };

    if current < target {
        let step = accel.max(0.0) * dt;
        (current + step).min(target)
    } else if current > target {
        let step = decel.max(0.0) * dt;
        (current - step).max(target)
    } else {
        current
    }
}

/// Asymmetric rate pair for [`seek`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateLimits {
    /// Rate (units/s) allowed while increasing.
    pub accel: f64,
    /// Rate (units/s) allowed while decreasing.
    pub decel: f64,
}

impl RateLimits {
    /// Create a validated rate pair.
    ///
    /// # Errors
    ///
    /// Returns error if either rate is negative or non-finite.
    pub fn new(accel: f64, decel: f64) -> ControlResult<Self> {
        if !accel.is_finite() || accel < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "accel rate must be non-negative and finite",
            });
        }
        if !decel.is_finite() || decel < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "decel rate must be non-negative and finite",
            });
        }
        Ok(Self { accel, decel })
    }

    /// Same rate in both directions.
    pub const fn symmetric(rate: f64) -> Self {
        Self {
            accel: rate,
            decel: rate,
        }
    }

    /// Rate limits are stored unchecked here; used for the engine's fixed tables.
    pub const fn from_rates(accel: f64, decel: f64) -> Self {
        Self { accel, decel }
    }

    /// Step `current` toward `target` over `dt`.
    pub fn apply(&self, current: f64, target: f64, dt: f64) -> f64 {
        seek(current, target, self.accel, self.decel, dt)
    }

    /// Largest change one step of `dt` can make.
    pub fn max_step(&self, dt: f64) -> f64 {
        self.accel.max(self.decel) * dt.max(0.0)
    }
}
