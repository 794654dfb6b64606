//! Fixed-step runner driving an engine through a control schedule.

use crate::ambient::Ambient;
use crate::error::{SimError, SimResult};
use crate::fuel::{FuelSupply, UnlimitedFuel};
use crate::observer::EngineObserver;
use crate::phase::Phase;
use crate::turbine::Turbine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Options for scenario runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Frame time step (seconds)
    pub dt: f64,
    /// Final time (seconds)
    pub t_end: f64,
    /// Maximum number of frames (safety limit)
    pub max_steps: usize,
    /// Record every N-th frame (decimation)
    pub record_every: usize,
    /// Place the engine in the run phase before the first frame
    pub start_running: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dt: 1.0 / 120.0,
            t_end: 60.0,
            max_steps: 1_000_000,
            record_every: 12,
            start_running: false,
        }
    }
}

/// A control input change.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum ControlAction {
    Throttle(f64),
    Starter(bool),
    Cutoff(bool),
    Ignition(bool),
    Augmentation(bool),
    Injection(bool),
    Reverser(bool),
    BleedDemand(f64),
}

impl ControlAction {
    fn apply<O: EngineObserver>(self, engine: &mut Turbine<O>) {
        match self {
            Self::Throttle(v) => engine.set_throttle(v),
            Self::Starter(on) => engine.set_starter(on),
            Self::Cutoff(on) => engine.set_cutoff(on),
            Self::Ignition(on) => engine.set_ignition(on),
            Self::Augmentation(on) => engine.set_augmentation(on),
            Self::Injection(on) => engine.set_injection(on),
            Self::Reverser(on) => engine.set_reverse(on),
            Self::BleedDemand(v) => engine.set_bleed_demand(v),
        }
    }
}

/// When a scheduled action fires.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// At or after this time
    At { t_s: f64 },
    /// Once N2 reaches this percentage
    N2Above { pct: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlEvent {
    pub trigger: Trigger,
    pub action: ControlAction,
}

impl ControlEvent {
    pub fn at(t_s: f64, action: ControlAction) -> Self {
        Self {
            trigger: Trigger::At { t_s },
            action,
        }
    }

    pub fn when_n2_above(pct: f64, action: ControlAction) -> Self {
        Self {
            trigger: Trigger::N2Above { pct },
            action,
        }
    }

    fn is_due(&self, t: f64, n2: f64) -> bool {
        match self.trigger {
            Trigger::At { t_s } => t + 1e-9 >= t_s,
            Trigger::N2Above { pct } => n2 >= pct,
        }
    }
}

/// Control events applied before the frame in which they come due. Each
/// fires at most once.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlSchedule {
    events: Vec<ControlEvent>,
}

impl ControlSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, event: ControlEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn push(&mut self, event: ControlEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[ControlEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<Vec<ControlEvent>> for ControlSchedule {
    fn from(events: Vec<ControlEvent>) -> Self {
        Self { events }
    }
}

/// One recorded frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub t: f64,
    pub phase: Phase,
    pub n1: f64,
    pub n2: f64,
    pub thrust_lbf: f64,
    pub fuel_flow_pph: f64,
    pub egt_degc: f64,
}

impl Sample {
    fn capture<O: EngineObserver>(t: f64, engine: &Turbine<O>) -> Self {
        Self {
            t,
            phase: engine.phase(),
            n1: engine.n1(),
            n2: engine.n2(),
            thrust_lbf: engine.thrust_lbf(),
            fuel_flow_pph: engine.fuel_flow_pph(),
            egt_degc: engine.egt_degc(),
        }
    }
}

/// Recorded run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub samples: Vec<Sample>,
    /// Fuel drawn from the supply over the run (lbm)
    pub fuel_burned_lbs: f64,
    pub steps: usize,
}

impl RunRecord {
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Phases in the order they were first seen in the recorded samples.
    pub fn phases(&self) -> Vec<Phase> {
        let mut seen: Vec<Phase> = Vec::new();
        for s in &self.samples {
            if seen.last() != Some(&s.phase) {
                seen.push(s.phase);
            }
        }
        seen
    }
}

/// Run with an unlimited fuel supply.
pub fn run<O: EngineObserver>(
    engine: &mut Turbine<O>,
    ambient: &Ambient,
    schedule: &ControlSchedule,
    opts: &RunOptions,
) -> SimResult<RunRecord> {
    run_with(engine, ambient, schedule, opts, &mut UnlimitedFuel)
}

/// Run drawing from `fuel`; the engine is starved once the supply is dry.
pub fn run_with<O: EngineObserver, F: FuelSupply>(
    engine: &mut Turbine<O>,
    ambient: &Ambient,
    schedule: &ControlSchedule,
    opts: &RunOptions,
    fuel: &mut F,
) -> SimResult<RunRecord> {
    if !opts.dt.is_finite() || opts.dt <= 0.0 {
        return Err(SimError::InvalidArg {
            what: "dt must be positive",
        });
    }
    if !opts.t_end.is_finite() || opts.t_end < 0.0 {
        return Err(SimError::InvalidArg {
            what: "t_end must be non-negative",
        });
    }
    if opts.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }
    if !ambient.tat_degc.is_finite() || !ambient.qbar_psf.is_finite() || ambient.qbar_psf < 0.0 {
        return Err(SimError::NonPhysical {
            what: "ambient temperature and dynamic pressure must be finite, qbar non-negative",
        });
    }

    if opts.start_running {
        engine.init_running(&*fuel, ambient)?;
    }

    let frames = ((opts.t_end / opts.dt).round() as usize).min(opts.max_steps);
    debug!(
        engine = %engine.constants().name,
        dt = opts.dt,
        frames,
        events = schedule.len(),
        "scenario start"
    );

    let mut fired = vec![false; schedule.len()];
    let mut record = RunRecord {
        samples: vec![Sample::capture(0.0, engine)],
        ..RunRecord::default()
    };

    let mut step = 0;
    while step < frames {
        let t = step as f64 * opts.dt;
        for (event, done) in schedule.events.iter().zip(fired.iter_mut()) {
            if !*done && event.is_due(t, engine.n2()) {
                event.action.apply(engine);
                *done = true;
            }
        }

        engine.calculate(ambient, opts.dt);
        let wanted = engine.fuel_expended_lbs(opts.dt);
        if wanted > 0.0 {
            record.fuel_burned_lbs += fuel.draw(wanted);
            if !fuel.has_fuel() && !engine.starved() {
                engine.set_starved(true);
            }
        }
        step += 1;

        if step % opts.record_every == 0 {
            record.samples.push(Sample::capture(step as f64 * opts.dt, engine));
        }
    }

    // Always record final state
    if step % opts.record_every != 0 {
        record.samples.push(Sample::capture(step as f64 * opts.dt, engine));
    }
    record.steps = step;

    info!(
        engine = %engine.constants().name,
        steps = step,
        phase = %engine.phase(),
        fuel_burned_lbs = record.fuel_burned_lbs,
        "scenario complete"
    );
    Ok(record)
}
