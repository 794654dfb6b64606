use crate::GtError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, GtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(GtError::NonFinite { what, value: v })
    }
}

/// Require `min <= v <= max` (and finite).
pub fn ensure_in_range(
    v: Real,
    min: Real,
    max: Real,
    what: &'static str,
) -> Result<Real, GtError> {
    let v = ensure_finite(v, what)?;
    if v < min || v > max {
        return Err(GtError::OutOfRange {
            what,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

/// Clamp to `[min, max]`, mapping NaN to `min`.
///
/// Control inputs come from outside the model and are never rejected.
pub fn clamp_input(v: Real, min: Real, max: Real) -> Real {
    if v.is_nan() { min } else { v.clamp(min, max) }
}
