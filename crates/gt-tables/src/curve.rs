//! The curve capability the engine consumes.

use crate::conditions::FlightConditions;
use std::fmt;

/// A pure function of flight condition.
///
/// Implementations must be deterministic: the same conditions always give
/// the same value. The engine evaluates each curve at most a handful of
/// times per tick.
pub trait Curve: Send + Sync + fmt::Debug {
    fn evaluate(&self, conditions: &FlightConditions) -> f64;
}

/// Curve with the same value everywhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantCurve(pub f64);

impl Curve for ConstantCurve {
    fn evaluate(&self, _conditions: &FlightConditions) -> f64 {
        self.0
    }
}

/// Adapter for closures, mostly for synthetic curves in tests.
pub struct FnCurve<F>(pub F)
where
    F: Fn(&FlightConditions) -> f64 + Send + Sync;

impl<F> fmt::Debug for FnCurve<F>
where
    F: Fn(&FlightConditions) -> f64 + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnCurve(..)")
    }
}

impl<F> Curve for FnCurve<F>
where
    F: Fn(&FlightConditions) -> f64 + Send + Sync,
{
    fn evaluate(&self, conditions: &FlightConditions) -> f64 {
        (self.0)(conditions)
    }
}

impl<C: Curve + ?Sized> Curve for Box<C> {
    fn evaluate(&self, conditions: &FlightConditions) -> f64 {
        (**self).evaluate(conditions)
    }
}
