//! Independent variables curves are evaluated against.

use serde::{Deserialize, Serialize};

/// Flight condition snapshot handed to every curve evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightConditions {
    /// Flight Mach number
    pub mach: f64,
    /// Pressure altitude (ft)
    pub altitude_ft: f64,
    /// Throttle position [0, 1]
    pub throttle: f64,
}

impl FlightConditions {
    pub fn new(mach: f64, altitude_ft: f64) -> Self {
        Self {
            mach,
            altitude_ft,
            throttle: 0.0,
        }
    }

    pub fn sea_level_static() -> Self {
        Self::default()
    }

    pub fn with_throttle(mut self, throttle: f64) -> Self {
        self.throttle = throttle;
        self
    }

    /// Read one independent variable.
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Mach => self.mach,
            Axis::AltitudeFt => self.altitude_ft,
            Axis::Throttle => self.throttle,
        }
    }
}

/// Independent variable selector for one-dimensional tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Mach,
    AltitudeFt,
    Throttle,
}

impl Axis {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mach => "mach",
            Self::AltitudeFt => "altitude_ft",
            Self::Throttle => "throttle",
        }
    }
}
