//! Thrust and consumption curves for the turbine engine model.
//!
//! The engine never looks inside a table. It asks a [`Curve`] for a value at
//! the current [`FlightConditions`], which lets tests substitute synthetic
//! curves and lets configuration supply breakpoint tables.

pub mod conditions;
pub mod curve;
pub mod error;
pub mod table;

pub use conditions::{Axis, FlightConditions};
pub use curve::{ConstantCurve, Curve, FnCurve};
pub use error::{TableError, TableResult};
pub use table::{Table1D, Table2D};
