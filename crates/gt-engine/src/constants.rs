//! Immutable engine constants and thrust curves.
//!
//! Built once by the configuration loader and injected into [`Turbine`]. The
//! engine never parses configuration text itself.
//!
//! [`Turbine`]: crate::turbine::Turbine

use crate::error::{EngineError, EngineResult};
use gt_core::ensure_in_range;
use gt_tables::{ConstantCurve, Curve};
use serde::{Deserialize, Serialize};

/// How the afterburner is commanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AugMethod {
    /// Driven by the `augmentation` flag (`set_augmentation`).
    #[default]
    Property,
    /// Lit by pushing the throttle past 99% with N2 above 97%.
    ThrottleDetent,
    /// Throttle range extends above 1.0; the excess is afterburner demand.
    ExtendedRange,
}

/// Thresholds for internally raised faults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaultLimits {
    /// EGT above this latches overtemp (°C)
    pub egt_limit_degc: f64,
    /// Sustained overtemp while running before the compressor stalls (s)
    pub stall_delay_s: f64,
    /// Sustained overtemp while fuelled before a fire starts (s)
    pub fire_delay_s: f64,
    /// Fire duration before the core seizes (s)
    pub seize_delay_s: f64,
    /// N2 (%) above which the core seizes
    pub overspeed_n2: f64,
}

impl Default for FaultLimits {
    fn default() -> Self {
        Self {
            egt_limit_degc: 850.0,
            stall_delay_s: 2.0,
            fire_delay_s: 10.0,
            seize_delay_s: 15.0,
            overspeed_n2: 105.0,
        }
    }
}

/// Static turbine description.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConstants {
    /// Name used in telemetry labels
    pub name: String,
    /// Maximum unaugmented thrust, static at sea level (lbf)
    pub mil_thrust_lbf: f64,
    /// Maximum augmented thrust, static at sea level (lbf)
    pub max_thrust_lbf: f64,
    /// Ratio of bypass to core airflow; only scales spool-up time
    pub bypass_ratio: f64,
    /// Thrust loss fraction, initial bleed demand [0, 1]
    pub bleed: f64,
    /// Thrust specific fuel consumption at cruise (lbm/hr/lbf)
    pub tsfc: f64,
    /// Augmented TSFC (lbm/hr/lbf)
    pub atsfc: f64,
    /// Fan spool speed at idle (% of max)
    pub idle_n1: f64,
    /// Core spool speed at idle (% of max)
    pub idle_n2: f64,
    /// Fan spool speed at full throttle (%)
    pub max_n1: f64,
    /// Core spool speed at full throttle (%)
    pub max_n2: f64,
    /// Starter spin-up rate for N1 (%/s)
    pub n1_spinup: f64,
    /// Starter spin-up rate for N2 (%/s)
    pub n2_spinup: f64,
    /// Afterburner installed
    pub augmented: bool,
    pub aug_method: AugMethod,
    /// Water injection installed
    pub injected: bool,
    /// Water supply duration (s)
    pub injection_time_s: f64,
    /// Extra N1 (%) available while injecting water
    pub injection_n1_increment: f64,
    /// Extra N2 (%) available while injecting water
    pub injection_n2_increment: f64,
    /// Fraction of forward thrust delivered rearward with the reverser deployed [0, 1]
    pub reverser_factor: f64,
    pub limits: FaultLimits,
}

impl EngineConstants {
    /// Constants for an unaugmented turbojet with the loader's defaults for
    /// everything not named here.
    pub fn new(
        name: impl Into<String>,
        mil_thrust_lbf: f64,
        tsfc: f64,
        idle_n1: f64,
        idle_n2: f64,
        max_n1: f64,
        max_n2: f64,
    ) -> Self {
        Self {
            name: name.into(),
            mil_thrust_lbf,
            max_thrust_lbf: mil_thrust_lbf,
            bypass_ratio: 0.0,
            bleed: 0.0,
            tsfc,
            atsfc: 1.7,
            idle_n1,
            idle_n2,
            max_n1,
            max_n2,
            n1_spinup: 1.0,
            n2_spinup: 3.0,
            augmented: false,
            aug_method: AugMethod::Property,
            injected: false,
            injection_time_s: 30.0,
            injection_n1_increment: 0.0,
            injection_n2_increment: 0.0,
            reverser_factor: 0.5,
            limits: FaultLimits::default(),
        }
    }

    /// Inverse spool-up time from idle to full throttle (%/s).
    pub fn delay(&self) -> f64 {
        90.0 / (self.bypass_ratio + 3.0)
    }

    /// N2 acceleration while lighting off and accelerating to idle (%/s).
    pub fn start_rate(&self) -> f64 {
        self.delay() / 15.0
    }

    pub fn n1_factor(&self) -> f64 {
        self.max_n1 - self.idle_n1
    }

    pub fn n2_factor(&self) -> f64 {
        self.max_n2 - self.idle_n2
    }

    /// Estimated idle fuel flow (lbm/hr).
    pub fn idle_fuel_flow_pph(&self) -> f64 {
        self.mil_thrust_lbf.powf(0.2) * 107.0
    }

    /// Check physical consistency.
    ///
    /// # Errors
    /// Returns the first offending field.
    pub fn validate(&self) -> EngineResult<()> {
        positive("mil_thrust_lbf", self.mil_thrust_lbf)?;
        positive("tsfc", self.tsfc)?;
        non_negative("bypass_ratio", self.bypass_ratio)?;
        ensure_in_range(self.bleed, 0.0, 1.0, "bleed")?;
        ensure_in_range(self.reverser_factor, 0.0, 1.0, "reverser_factor")?;
        non_negative("idle_n1", self.idle_n1)?;
        non_negative("idle_n2", self.idle_n2)?;
        positive("n1_spinup", self.n1_spinup)?;
        positive("n2_spinup", self.n2_spinup)?;
        non_negative("injection_n1_increment", self.injection_n1_increment)?;
        non_negative("injection_n2_increment", self.injection_n2_increment)?;

        if !self.max_n1.is_finite() || self.max_n1 <= self.idle_n1 {
            return Err(EngineError::InvalidConstant {
                field: "max_n1",
                value: self.max_n1,
                reason: "must exceed idle_n1",
            });
        }
        if !self.max_n2.is_finite() || self.max_n2 <= self.idle_n2 {
            return Err(EngineError::InvalidConstant {
                field: "max_n2",
                value: self.max_n2,
                reason: "must exceed idle_n2",
            });
        }
        if self.augmented {
            positive("atsfc", self.atsfc)?;
            if !self.max_thrust_lbf.is_finite() || self.max_thrust_lbf < self.mil_thrust_lbf {
                return Err(EngineError::InvalidConstant {
                    field: "max_thrust_lbf",
                    value: self.max_thrust_lbf,
                    reason: "augmented thrust must be at least military thrust",
                });
            }
        }
        if self.injected {
            positive("injection_time_s", self.injection_time_s)?;
        }

        let limits = &self.limits;
        positive("limits.egt_limit_degc", limits.egt_limit_degc)?;
        non_negative("limits.stall_delay_s", limits.stall_delay_s)?;
        non_negative("limits.fire_delay_s", limits.fire_delay_s)?;
        non_negative("limits.seize_delay_s", limits.seize_delay_s)?;
        let n2_ceiling = if self.injected {
            self.max_n2 + self.injection_n2_increment
        } else {
            self.max_n2
        };
        if !limits.overspeed_n2.is_finite() || limits.overspeed_n2 < n2_ceiling {
            return Err(EngineError::InvalidConstant {
                field: "limits.overspeed_n2",
                value: limits.overspeed_n2,
                reason: "overspeed limit must cover max_n2 plus any injection increment",
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::InvalidConstant {
            field,
            value,
            reason: "must be positive and finite",
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::InvalidConstant {
            field,
            value,
            reason: "must be non-negative and finite",
        });
    }
    Ok(())
}


/// Thrust fraction curves, each a multiple of rated static thrust.
#[derive(Debug)]
pub struct ThrustCurves {
    /// Idle thrust as a fraction of military thrust
    pub idle: Box<dyn Curve>,
    /// Military thrust lapse
    pub mil: Box<dyn Curve>,
    /// Augmented thrust lapse; required when an afterburner is installed
    pub max: Option<Box<dyn Curve>>,
    /// Thrust multiplier while injecting water; required when injection is installed
    pub injection: Option<Box<dyn Curve>>,
}

impl ThrustCurves {
    pub fn new(idle: Box<dyn Curve>, mil: Box<dyn Curve>) -> Self {
        Self {
            idle,
            mil,
            max: None,
            injection: None,
        }
    }

    /// Flat curves, independent of flight condition.
    pub fn constant(idle: f64, mil: f64) -> Self {
        Self::new(Box::new(ConstantCurve(idle)), Box::new(ConstantCurve(mil)))
    }

    pub fn with_max(mut self, max: Box<dyn Curve>) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_injection(mut self, injection: Box<dyn Curve>) -> Self {
        self.injection = Some(injection);
        self
    }

    /// Check the curves cover what the constants install.
    pub fn validate(&self, constants: &EngineConstants) -> EngineResult<()> {
        if constants.augmented && self.max.is_none() {
            return Err(EngineError::MissingCurve {
                what: "max thrust curve required when augmented",
            });
        }
        if constants.injected && self.injection.is_none() {
            return Err(EngineError::MissingCurve {
                what: "injection curve required when water injection is installed",
            });
        }
        Ok(())
    }
}
