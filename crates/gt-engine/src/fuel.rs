//! Commanded fuel flow and the fuel supply seam.

use crate::phase::Phase;
use gt_core::constants::SECONDS_PER_HOUR;

/// Reference temperature for TSFC correction (°R).
const TSFC_REFERENCE_RANKINE: f64 = 389.7;

/// Whatever feeds the engine: a tank, a fuel system, or nothing at all.
pub trait FuelSupply {
    fn has_fuel(&self) -> bool;

    /// Remove up to `lbs` of fuel and return how much was delivered.
    fn draw(&mut self, lbs: f64) -> f64 {
        lbs.max(0.0)
    }
}

/// Supply that never runs dry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnlimitedFuel;

impl FuelSupply for UnlimitedFuel {
    fn has_fuel(&self) -> bool {
        true
    }
}

/// Finite fuel quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelTank {
    contents_lbs: f64,
}

impl FuelTank {
    pub fn new(contents_lbs: f64) -> Self {
        Self {
            contents_lbs: contents_lbs.max(0.0),
        }
    }

    pub fn contents_lbs(&self) -> f64 {
        self.contents_lbs
    }
}

impl FuelSupply for FuelTank {
    fn has_fuel(&self) -> bool {
        self.contents_lbs > 0.0
    }

    fn draw(&mut self, lbs: f64) -> f64 {
        let delivered = lbs.max(0.0).min(self.contents_lbs);
        self.contents_lbs -= delivered;
        delivered
    }
}

/// Everything the fuel schedule reads from one tick of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FuelDemand {
    pub cutoff: bool,
    pub idle_flow_pph: f64,
    pub n2: f64,
    pub idle_n2: f64,
    pub idle_thrust_lbf: f64,
    /// Dry thrust before bleed losses
    pub dry_thrust_lbf: f64,
    /// Thrust added by the afterburner over dry thrust
    pub aug_extra_lbf: f64,
    pub atsfc: f64,
}

/// TSFC corrected for inlet temperature and spool position.
///
/// Consumption per pound of thrust is highest near idle and falls toward
/// full power.
pub fn corrected_tsfc(tsfc: f64, tat_rankine: f64, n2_norm: f64) -> f64 {
    let n = n2_norm.clamp(0.0, 1.0);
    let theta = (tat_rankine.max(0.0) / TSFC_REFERENCE_RANKINE).sqrt();
    tsfc * theta * (0.84 + (1.0 - n) * (1.0 - n))
}

/// Commanded fuel flow (lbm/hr) for `phase`.
pub fn commanded_flow(phase: Phase, demand: &FuelDemand, tsfc_eff: f64) -> f64 {
    if demand.cutoff {
        return 0.0;
    }
    match phase {
        Phase::Off | Phase::SpinUp | Phase::Seize => 0.0,
        Phase::Start => {
            let fraction = if demand.idle_n2 > 0.0 {
                (demand.n2 / demand.idle_n2).clamp(0.0, 1.0)
            } else {
                1.0
            };
            demand.idle_flow_pph * fraction
        }
        Phase::Stall => demand.idle_flow_pph,
        Phase::Run | Phase::Trim => {
            let above_idle = (demand.dry_thrust_lbf - demand.idle_thrust_lbf).max(0.0);
            demand.idle_flow_pph
                + above_idle * tsfc_eff
                + demand.aug_extra_lbf.max(0.0) * demand.atsfc
        }
    }
}

/// Fuel burned over `dt` seconds at `flow_pph`.
pub fn fuel_mass_lbs(flow_pph: f64, dt: f64) -> f64 {
    flow_pph.max(0.0) / SECONDS_PER_HOUR * dt.max(0.0)
}
