//! Phase and fault notifications.
//!
//! The engine reports every phase transition and fault onset through an
//! [`EngineObserver`]. The default observer forwards them to `tracing`.

use crate::faults::Fault;
use crate::phase::Phase;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    PhaseChanged { from: Phase, to: Phase },
    FaultRaised(Fault),
    FaultCleared(Fault),
    /// Water injection ran its supply dry and switched itself off.
    InjectionExhausted,
    /// State restored to initial conditions.
    Reset,
}

pub trait EngineObserver {
    fn on_event(&mut self, event: &EngineEvent);
}

/// Emits events as `tracing` records tagged with the engine name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracingObserver {
    engine: String,
}

impl TracingObserver {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
        }
    }
}

impl EngineObserver for TracingObserver {
    fn on_event(&mut self, event: &EngineEvent) {
        let engine = self.engine.as_str();
        match event {
            EngineEvent::PhaseChanged { from, to } => {
                info!(engine = %engine, %from, %to, "phase change");
            }
            EngineEvent::FaultRaised(fault) => warn!(engine = %engine, %fault, "fault raised"),
            EngineEvent::FaultCleared(fault) => info!(engine = %engine, %fault, "fault cleared"),
            EngineEvent::InjectionExhausted => info!(engine = %engine, "water injection exhausted"),
            EngineEvent::Reset => info!(engine = %engine, "reset to initial conditions"),
        }
    }
}

/// Records every event, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<EngineEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Drain recorded events.
    pub fn take(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Phases entered, in order.
    pub fn phases_entered(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::PhaseChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    pub fn faults_raised(&self) -> Vec<Fault> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::FaultRaised(f) => Some(*f),
                _ => None,
            })
            .collect()
    }
}

impl EngineObserver for EventLog {
    fn on_event(&mut self, event: &EngineEvent) {
        self.events.push(*event);
    }
}
