//! Engine definition and scenario schema.

use gt_core::constants::ISA_SL_DEGC;
use gt_core::{force_lbf, lbf, newtons};
use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(default = "default_version")]
    pub version: u32,
    pub engine: EngineDef,
    #[serde(default)]
    pub ambient: AmbientDef,
    #[serde(default)]
    pub run: RunDef,
    #[serde(default)]
    pub controls: Vec<ControlDef>,
}

fn default_version() -> u32 {
    LATEST_VERSION
}

/// Static engine description.
///
/// Key names follow the conventional turbine definition keys (`milthrust`,
/// `idlen2`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineDef {
    pub name: String,
    #[serde(rename = "milthrust")]
    pub mil_thrust: ForceDef,
    #[serde(rename = "maxthrust", default, skip_serializing_if = "Option::is_none")]
    pub max_thrust: Option<ForceDef>,
    #[serde(rename = "bypassratio", default)]
    pub bypass_ratio: f64,
    #[serde(default)]
    pub bleed: f64,
    pub tsfc: f64,
    #[serde(default = "default_atsfc")]
    pub atsfc: f64,
    #[serde(rename = "idlen1")]
    pub idle_n1: f64,
    #[serde(rename = "idlen2")]
    pub idle_n2: f64,
    #[serde(rename = "maxn1")]
    pub max_n1: f64,
    #[serde(rename = "maxn2")]
    pub max_n2: f64,
    #[serde(rename = "n1spinup", default = "default_n1_spinup")]
    pub n1_spinup: f64,
    #[serde(rename = "n2spinup", default = "default_n2_spinup")]
    pub n2_spinup: f64,
    #[serde(default)]
    pub augmented: bool,
    #[serde(rename = "augmethod", default)]
    pub aug_method: AugMethodDef,
    #[serde(default)]
    pub injected: bool,
    #[serde(default = "default_injection_time")]
    pub injection_time: f64,
    #[serde(rename = "injn1increment", default)]
    pub injection_n1_increment: f64,
    #[serde(rename = "injn2increment", default)]
    pub injection_n2_increment: f64,
    #[serde(rename = "reverserfactor", default = "default_reverser_factor")]
    pub reverser_factor: f64,
    #[serde(default)]
    pub limits: LimitsDef,
    pub tables: TablesDef,
}

fn default_atsfc() -> f64 {
    1.7
}

fn default_n1_spinup() -> f64 {
    1.0
}

fn default_n2_spinup() -> f64 {
    3.0
}

fn default_injection_time() -> f64 {
    30.0
}

fn default_reverser_factor() -> f64 {
    0.5
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ForceDef {
    pub value: f64,
    #[serde(default)]
    pub unit: ForceUnit,
}

impl ForceDef {
    pub fn lbf(value: f64) -> Self {
        Self {
            value,
            unit: ForceUnit::Lbf,
        }
    }

    /// Value in pounds-force.
    pub fn to_lbf(&self) -> f64 {
        match self.unit {
            ForceUnit::Lbf => self.value,
            ForceUnit::Newton => force_lbf(newtons(self.value)),
        }
    }

    /// Value in newtons.
    pub fn to_newtons(&self) -> f64 {
        match self.unit {
            ForceUnit::Lbf => lbf(self.value).value,
            ForceUnit::Newton => self.value,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ForceUnit {
    #[default]
    #[serde(rename = "lbf")]
    Lbf,
    #[serde(rename = "N")]
    Newton,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AugMethodDef {
    #[default]
    Property,
    ThrottleDetent,
    ExtendedRange,
}

/// Fault thresholds. Omitted keys take the standard limits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LimitsDef {
    #[serde(default = "default_egt_limit")]
    pub egt_limit_degc: f64,
    #[serde(default = "default_stall_delay")]
    pub stall_delay_s: f64,
    #[serde(default = "default_fire_delay")]
    pub fire_delay_s: f64,
    #[serde(default = "default_seize_delay")]
    pub seize_delay_s: f64,
    #[serde(default = "default_overspeed")]
    pub overspeed_n2: f64,
}

impl Default for LimitsDef {
    fn default() -> Self {
        Self {
            egt_limit_degc: default_egt_limit(),
            stall_delay_s: default_stall_delay(),
            fire_delay_s: default_fire_delay(),
            seize_delay_s: default_seize_delay(),
            overspeed_n2: default_overspeed(),
        }
    }
}

fn default_egt_limit() -> f64 {
    850.0
}

fn default_stall_delay() -> f64 {
    2.0
}

fn default_fire_delay() -> f64 {
    10.0
}

fn default_seize_delay() -> f64 {
    15.0
}

fn default_overspeed() -> f64 {
    105.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TablesDef {
    pub idle: CurveDef,
    pub mil: CurveDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<CurveDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injection: Option<CurveDef>,
}

/// Thrust fraction as a function of flight condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CurveDef {
    Constant {
        value: f64,
    },
    Mach {
        mach: Vec<f64>,
        values: Vec<f64>,
    },
    Altitude {
        altitude_ft: Vec<f64>,
        values: Vec<f64>,
    },
    /// Rows indexed by Mach, columns by altitude.
    MachAltitude {
        mach: Vec<f64>,
        altitude_ft: Vec<f64>,
        values: Vec<Vec<f64>>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AmbientDef {
    #[serde(default = "default_tat")]
    pub tat_degc: f64,
    #[serde(default)]
    pub qbar_psf: f64,
    #[serde(default)]
    pub mach: f64,
    #[serde(default)]
    pub altitude_ft: f64,
}

fn default_tat() -> f64 {
    ISA_SL_DEGC
}

impl Default for AmbientDef {
    fn default() -> Self {
        Self {
            tat_degc: default_tat(),
            qbar_psf: 0.0,
            mach: 0.0,
            altitude_ft: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default = "default_t_end")]
    pub t_end: f64,
    #[serde(default = "default_record_every")]
    pub record_every: usize,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Start the run with the engine already running
    #[serde(default)]
    pub start_running: bool,
    #[serde(default)]
    pub throttle: f64,
    /// Finite fuel load (lbm); unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_lbs: Option<f64>,
}

fn default_dt() -> f64 {
    1.0 / 120.0
}

fn default_t_end() -> f64 {
    60.0
}

fn default_record_every() -> usize {
    12
}

fn default_max_steps() -> usize {
    1_000_000
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            t_end: default_t_end(),
            record_every: default_record_every(),
            max_steps: default_max_steps(),
            start_running: false,
            throttle: 0.0,
            fuel_lbs: None,
        }
    }
}

/// A control change, fired once when its trigger is met.
///
/// Exactly one of `at_s` and `when_n2_above` must be given.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ControlDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_n2_above: Option<f64>,
    pub action: ActionDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ActionDef {
    Throttle { value: f64 },
    Starter { on: bool },
    Cutoff { on: bool },
    Ignition { on: bool },
    Augmentation { on: bool },
    Injection { on: bool },
    Reverser { on: bool },
    BleedDemand { value: f64 },
}
