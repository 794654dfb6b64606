//! Delimited label/value export of engine state.
//!
//! Labels and values are generated from one ordered column list so the two
//! strings always line up.

use crate::turbine::EngineState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryColumn {
    N1,
    N2,
    Thrust,
    FuelFlow,
    Egt,
    Epr,
    OilPressure,
    OilTemp,
    Nozzle,
    Inlet,
    Phase,
    Stalled,
    Seized,
    Overtemp,
    Fire,
}

impl TelemetryColumn {
    pub const ALL: [TelemetryColumn; 15] = [
        Self::N1,
        Self::N2,
        Self::Thrust,
        Self::FuelFlow,
        Self::Egt,
        Self::Epr,
        Self::OilPressure,
        Self::OilTemp,
        Self::Nozzle,
        Self::Inlet,
        Self::Phase,
        Self::Stalled,
        Self::Seized,
        Self::Overtemp,
        Self::Fire,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::N1 => "N1",
            Self::N2 => "N2",
            Self::Thrust => "Thrust (lbf)",
            Self::FuelFlow => "Fuel Flow (pph)",
            Self::Egt => "EGT (degC)",
            Self::Epr => "EPR",
            Self::OilPressure => "Oil Pressure (psi)",
            Self::OilTemp => "Oil Temp (degK)",
            Self::Nozzle => "Nozzle Position",
            Self::Inlet => "Inlet Position",
            Self::Phase => "Phase",
            Self::Stalled => "Stalled",
            Self::Seized => "Seized",
            Self::Overtemp => "Overtemp",
            Self::Fire => "Fire",
        }
    }

    pub fn value(self, state: &EngineState) -> String {
        let flag = |b: bool| if b { "1" } else { "0" }.to_string();
        match self {
            Self::N1 => format!("{:.3}", state.n1),
            Self::N2 => format!("{:.3}", state.n2),
            Self::Thrust => format!("{:.2}", state.thrust_lbf),
            Self::FuelFlow => format!("{:.2}", state.fuel_flow_pph),
            Self::Egt => format!("{:.2}", state.egt_degc),
            Self::Epr => format!("{:.4}", state.epr),
            Self::OilPressure => format!("{:.2}", state.oil_pressure_psi),
            Self::OilTemp => format!("{:.2}", state.oil_temp_degk),
            Self::Nozzle => format!("{:.4}", state.nozzle.position),
            Self::Inlet => format!("{:.4}", state.inlet.position),
            Self::Phase => state.phase.label().to_string(),
            Self::Stalled => flag(state.faults.stalled),
            Self::Seized => flag(state.faults.seized),
            Self::Overtemp => flag(state.faults.overtemp),
            Self::Fire => flag(state.faults.fire),
        }
    }
}

/// Column headers, e.g. `J85 N1 (engine 0)`. Delimiter text inside a label
/// is replaced with `_` so the header always has one field per column.
pub fn labels(name: &str, engine_number: usize, delimiter: &str) -> String {
    TelemetryColumn::ALL
        .iter()
        .map(|c| {
            let label = format!("{name} {} (engine {engine_number})", c.label());
            if delimiter.is_empty() {
                label
            } else {
                label.replace(delimiter, "_")
            }
        })
        .collect::<Vec<_>>()
        .join(delimiter)
}

pub fn values(state: &EngineState, delimiter: &str) -> String {
    TelemetryColumn::ALL
        .iter()
        .map(|c| c.value(state))
        .collect::<Vec<_>>()
        .join(delimiter)
}
