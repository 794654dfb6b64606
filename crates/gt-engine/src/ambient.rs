//! Atmospheric inputs sampled once per frame.

use gt_core::constants::ISA_SL_DEGC;
use gt_core::{degc, temp_rankine};
use gt_tables::FlightConditions;
use serde::{Deserialize, Serialize};

/// Air data the owning simulation hands the engine every tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ambient {
    /// Total air temperature (°C)
    pub tat_degc: f64,
    /// Dynamic pressure (psf); drives windmilling and air starts
    pub qbar_psf: f64,
    #[serde(default)]
    pub conditions: FlightConditions,
}

impl Ambient {
    pub fn new(tat_degc: f64, qbar_psf: f64, conditions: FlightConditions) -> Self {
        Self {
            tat_degc,
            qbar_psf,
            conditions,
        }
    }

    /// Standard day, static, sea level.
    pub fn sea_level() -> Self {
        Self::new(ISA_SL_DEGC, 0.0, FlightConditions::sea_level_static())
    }

    pub fn tat_rankine(&self) -> f64 {
        temp_rankine(degc(self.tat_degc))
    }
}

impl Default for Ambient {
    fn default() -> Self {
        Self::sea_level()
    }
}
