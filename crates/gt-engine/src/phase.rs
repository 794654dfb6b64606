//! Engine operating phase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mode of operation. Exactly one phase is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Shut down; spools windmill or decay toward rest.
    Off,
    /// Starter motoring the core, no fuel.
    SpinUp,
    /// Fuel on, lit, accelerating to idle.
    Start,
    /// Normal running.
    Run,
    /// Compressor stall.
    Stall,
    /// Core seized. Absorbing until reset.
    Seize,
    /// Zero-lag steady-state evaluation used while trimming.
    Trim,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Self::Off,
        Self::SpinUp,
        Self::Start,
        Self::Run,
        Self::Stall,
        Self::Seize,
        Self::Trim,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::SpinUp => "SpinUp",
            Self::Start => "Start",
            Self::Run => "Run",
            Self::Stall => "Stall",
            Self::Seize => "Seize",
            Self::Trim => "Trim",
        }
    }

    /// Phases in which fuel is being burned.
    pub fn is_lit(self) -> bool {
        matches!(self, Self::Start | Self::Run | Self::Stall | Self::Trim)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
