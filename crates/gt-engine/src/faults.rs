//! Mechanical fault flags and the monitor that latches them.

use crate::constants::FaultLimits;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A latched degraded state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fault {
    Stall,
    Seizure,
    Overtemp,
    Fire,
}

impl Fault {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stall => "stall",
            Self::Seizure => "seizure",
            Self::Overtemp => "overtemp",
            Self::Fire => "fire",
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Latched fault flags plus the exposure timers that drive them.
///
/// Flags only ever go from false to true here. Clearing is the engine's job
/// (stall recovery, reset to initial conditions).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaultState {
    pub stalled: bool,
    pub seized: bool,
    pub overtemp: bool,
    pub fire: bool,
    /// Continuous time EGT has been above the limit (s)
    pub overtemp_s: f64,
    /// Time the fire has been burning (s)
    pub fire_s: f64,
}

/// What the engine observed this tick, as seen by the fault monitor.
#[derive(Debug, Clone, Copy)]
pub struct FaultInputs {
    pub egt_degc: f64,
    pub n2: f64,
    /// Only running engines can stall.
    pub running: bool,
    /// Only fuelled engines can catch fire.
    pub fuelled: bool,
}

impl FaultState {
    pub fn is_set(&self, fault: Fault) -> bool {
        match fault {
            Fault::Stall => self.stalled,
            Fault::Seizure => self.seized,
            Fault::Overtemp => self.overtemp,
            Fault::Fire => self.fire,
        }
    }

    /// Latch `fault`. Returns true on onset (it was not already set).
    pub fn latch(&mut self, fault: Fault) -> bool {
        let flag = match fault {
            Fault::Stall => &mut self.stalled,
            Fault::Seizure => &mut self.seized,
            Fault::Overtemp => &mut self.overtemp,
            Fault::Fire => &mut self.fire,
        };
        let onset = !*flag;
        *flag = true;
        onset
    }

    /// Clear `fault`. Returns true if it was set.
    pub fn clear(&mut self, fault: Fault) -> bool {
        let flag = match fault {
            Fault::Stall => &mut self.stalled,
            Fault::Seizure => &mut self.seized,
            Fault::Overtemp => &mut self.overtemp,
            Fault::Fire => &mut self.fire,
        };
        let was = *flag;
        *flag = false;
        if fault == Fault::Stall {
            // A recovered engine gets the full stall delay again
            self.overtemp_s = 0.0;
        }
        was
    }

    /// Advance exposure timers by `dt` and latch whatever crossed a limit.
    ///
    /// Returns the faults that began this tick, in order of severity onset.
    pub fn monitor(&mut self, limits: &FaultLimits, inputs: FaultInputs, dt: f64) -> Vec<Fault> {
        let mut onset = Vec::new();

        if inputs.egt_degc > limits.egt_limit_degc {
            self.overtemp_s += dt;
            if self.latch(Fault::Overtemp) {
                onset.push(Fault::Overtemp);
            }
        } else {
            self.overtemp_s = 0.0;
        }

        if inputs.running
            && !self.stalled
            && self.overtemp_s > 0.0
            && self.overtemp_s >= limits.stall_delay_s
            && self.latch(Fault::Stall)
        {
            onset.push(Fault::Stall);
        }

        if inputs.fuelled
            && self.overtemp_s > 0.0
            && self.overtemp_s >= limits.fire_delay_s
            && self.latch(Fault::Fire)
        {
            onset.push(Fault::Fire);
        }

        if self.fire {
            self.fire_s += dt;
        }

        let burned_through = self.fire && self.fire_s >= limits.seize_delay_s;
        let overspeed = inputs.n2 > limits.overspeed_n2;
        if (burned_through || overspeed) && self.latch(Fault::Seizure) {
            onset.push(Fault::Seizure);
        }

        onset
    }
}
