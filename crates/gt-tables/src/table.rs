//! Breakpoint tables with clamped linear interpolation.
//!
//! Outside the breakpoint range the end value is held, never extrapolated:
//! a thrust table defined to Mach 2.0 reports its Mach 2.0 value at Mach 2.4.

use crate::conditions::{Axis, FlightConditions};
use crate::curve::Curve;
use crate::error::{TableError, TableResult};

/// Locate `x` in `breakpoints`: returns `(lower index, fraction toward upper)`.
///
/// `breakpoints` must hold at least two strictly increasing values.
fn bracket(breakpoints: &[f64], x: f64) -> (usize, f64) {
    let last = breakpoints.len() - 1;
    if x.is_nan() || x <= breakpoints[0] {
        return (0, 0.0);
    }
    if x >= breakpoints[last] {
        return (last - 1, 1.0);
    }
    // First breakpoint strictly greater than x
    let upper = breakpoints.partition_point(|&b| b <= x);
    let lower = upper - 1;
    let span = breakpoints[upper] - breakpoints[lower];
    (lower, (x - breakpoints[lower]) / span)
}

fn check_axis(axis: &'static str, breakpoints: &[f64]) -> TableResult<()> {
    if breakpoints.len() < 2 {
        return Err(TableError::TooFewBreakpoints {
            axis,
            min: 2,
            got: breakpoints.len(),
        });
    }
    if breakpoints.iter().any(|b| !b.is_finite()) {
        return Err(TableError::NonFinite { what: axis });
    }
    if let Some(index) = breakpoints.windows(2).position(|w| w[1] <= w[0]) {
        return Err(TableError::NotIncreasing {
            axis,
            index: index + 1,
        });
    }
    Ok(())
}

/// One independent variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Table1D {
    axis: Axis,
    breakpoints: Vec<f64>,
    values: Vec<f64>,
}

impl Table1D {
    /// Build a table over `axis`.
    ///
    /// # Errors
    /// Fewer than two breakpoints, non-increasing breakpoints, non-finite
    /// entries, or a value count that does not match the breakpoints.
    pub fn new(axis: Axis, breakpoints: Vec<f64>, values: Vec<f64>) -> TableResult<Self> {
        check_axis(axis.label(), &breakpoints)?;
        if values.len() != breakpoints.len() {
            return Err(TableError::ShapeMismatch {
                expected: breakpoints.len(),
                got: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(TableError::NonFinite { what: "values" });
        }
        Ok(Self {
            axis,
            breakpoints,
            values,
        })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn lookup(&self, x: f64) -> f64 {
        let (i, frac) = bracket(&self.breakpoints, x);
        self.values[i] + frac * (self.values[i + 1] - self.values[i])
    }
}

impl Curve for Table1D {
    fn evaluate(&self, conditions: &FlightConditions) -> f64 {
        self.lookup(conditions.get(self.axis))
    }
}

/// Mach (rows) by altitude (columns), the usual shape of engine thrust data.
#[derive(Clone, Debug, PartialEq)]
pub struct Table2D {
    mach: Vec<f64>,
    altitude_ft: Vec<f64>,
    /// Row-major: `values[row * altitude_ft.len() + col]`
    values: Vec<f64>,
}

impl Table2D {
    /// Build from one row of values per Mach breakpoint.
    ///
    /// # Errors
    /// Same rules as [`Table1D::new`] on both axes; every row must have one
    /// value per altitude breakpoint.
    pub fn new(mach: Vec<f64>, altitude_ft: Vec<f64>, rows: Vec<Vec<f64>>) -> TableResult<Self> {
        check_axis(Axis::Mach.label(), &mach)?;
        check_axis(Axis::AltitudeFt.label(), &altitude_ft)?;
        if rows.len() != mach.len() {
            return Err(TableError::ShapeMismatch {
                expected: mach.len(),
                got: rows.len(),
            });
        }
        let mut values = Vec::with_capacity(mach.len() * altitude_ft.len());
        for row in rows {
            if row.len() != altitude_ft.len() {
                return Err(TableError::ShapeMismatch {
                    expected: altitude_ft.len(),
                    got: row.len(),
                });
            }
            values.extend(row);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(TableError::NonFinite { what: "values" });
        }
        Ok(Self {
            mach,
            altitude_ft,
            values,
        })
    }

    fn at(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.altitude_ft.len() + col]
    }

    /// Bilinear interpolation, clamped at the table edges.
    pub fn lookup(&self, mach: f64, altitude_ft: f64) -> f64 {
        let (r, fr) = bracket(&self.mach, mach);
        let (c, fc) = bracket(&self.altitude_ft, altitude_ft);
        let low = self.at(r, c) + fc * (self.at(r, c + 1) - self.at(r, c));
        let high = self.at(r + 1, c) + fc * (self.at(r + 1, c + 1) - self.at(r + 1, c));
        low + fr * (high - low)
    }
}

impl Curve for Table2D {
    fn evaluate(&self, conditions: &FlightConditions) -> f64 {
        self.lookup(conditions.mach, conditions.altitude_ft)
    }
}
