//! Scenario execution: build the engine, drive it through the project's
//! control schedule and collect the results.

use gt_engine::{
    EngineEvent, EngineObserver, EventLog, Fault, FuelTank, Phase, RunRecord, TracingObserver,
    run, run_with,
};
use gt_project::schema::Project;
use tracing::info;

use crate::engine_build::{build_ambient, build_engine_with, build_run_options, build_schedule};
use crate::error::{AppError, AppResult};

/// Command-line overrides for the project's run block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunOverrides {
    pub dt: Option<f64>,
    pub t_end: Option<f64>,
}

/// Keeps every engine event and forwards it to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    log: EventLog,
    tracing: TracingObserver,
}

impl RecordingObserver {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            log: EventLog::new(),
            tracing: TracingObserver::new(engine),
        }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }
}

impl EngineObserver for RecordingObserver {
    fn on_event(&mut self, event: &EngineEvent) {
        self.log.on_event(event);
        self.tracing.on_event(event);
    }
}

/// Everything a finished scenario produced.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub engine: String,
    pub record: RunRecord,
    pub final_phase: Phase,
    /// Faults raised during the run, in onset order
    pub faults: Vec<Fault>,
    pub events: Vec<EngineEvent>,
    /// Fuel left in the tank; `None` for an unlimited supply
    pub fuel_remaining_lbs: Option<f64>,
    /// Telemetry header row for the engine's final state
    pub telemetry_labels: String,
    /// Telemetry values for the engine's final state
    pub telemetry_values: String,
}

/// Run the scenario described by `project`.
///
/// Telemetry strings use `delimiter` between columns.
pub fn run_project(
    project: &Project,
    overrides: &RunOverrides,
    delimiter: &str,
) -> AppResult<ScenarioOutcome> {
    gt_project::validate_project(project)?;

    let mut opts = build_run_options(&project.run);
    if let Some(dt) = overrides.dt {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(AppError::InvalidInput(format!("dt must be positive, got {dt}")));
        }
        opts.dt = dt;
    }
    if let Some(t_end) = overrides.t_end {
        if !t_end.is_finite() || t_end < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "t_end must be non-negative, got {t_end}"
            )));
        }
        opts.t_end = t_end;
    }

    let name = project.engine.name.clone();
    let mut engine = build_engine_with(&project.engine, RecordingObserver::new(name.clone()))?;
    let ambient = build_ambient(&project.ambient);
    let schedule = build_schedule(&project.controls)?;
    engine.set_throttle(project.run.throttle);

    let (record, fuel_remaining_lbs) = match project.run.fuel_lbs {
        Some(lbs) => {
            let mut tank = FuelTank::new(lbs);
            let record = run_with(&mut engine, &ambient, &schedule, &opts, &mut tank)?;
            (record, Some(tank.contents_lbs()))
        }
        None => (run(&mut engine, &ambient, &schedule, &opts)?, None),
    };

    let log = engine.observer().log();
    let outcome = ScenarioOutcome {
        engine: name,
        final_phase: engine.phase(),
        faults: log.faults_raised(),
        events: log.events().to_vec(),
        fuel_remaining_lbs,
        telemetry_labels: engine.engine_labels(delimiter),
        telemetry_values: engine.engine_values(delimiter),
        record,
    };
    info!(
        engine = %outcome.engine,
        samples = outcome.record.samples.len(),
        phase = %outcome.final_phase,
        faults = outcome.faults.len(),
        "scenario finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gt_project::from_yaml_str;

    const GROUND_START: &str = r#"
engine:
  name: demo
  milthrust: { value: 10000 }
  tsfc: 0.8
  idlen1: 15.0
  idlen2: 60.0
  maxn1: 100.0
  maxn2: 100.0
  tables:
    idle: { type: Constant, value: 0.03 }
    mil: { type: Constant, value: 1.0 }
run:
  t_end: 40.0
controls:
  - at_s: 0.0
    action: { type: Starter, on: true }
  - when_n2_above: 15.0
    action: { type: Cutoff, on: false }
"#;

    #[test]
    fn ground_start_reaches_run() {
        let project = from_yaml_str(GROUND_START).unwrap();
        let out = run_project(&project, &RunOverrides::default(), ",").unwrap();
        assert_eq!(out.final_phase, Phase::Run);
        assert!(out.faults.is_empty());
        assert!(out.fuel_remaining_lbs.is_none());
        assert!(out.record.fuel_burned_lbs > 0.0);
        assert!(out.events.iter().any(|e| matches!(
            e,
            EngineEvent::PhaseChanged {
                to: Phase::Start,
                ..
            }
        )));
    }

    #[test]
    fn overrides_replace_run_block() {
        let project = from_yaml_str(GROUND_START).unwrap();
        let overrides = RunOverrides {
            dt: Some(0.05),
            t_end: Some(1.0),
        };
        let out = run_project(&project, &overrides, ",").unwrap();
        assert_eq!(out.record.steps, 20);
        let last = out.record.last().unwrap();
        assert!((last.t - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bad_override_is_rejected() {
        let project = from_yaml_str(GROUND_START).unwrap();
        let overrides = RunOverrides {
            dt: Some(0.0),
            t_end: None,
        };
        assert!(matches!(
            run_project(&project, &overrides, ","),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn telemetry_uses_delimiter() {
        let project = from_yaml_str(GROUND_START).unwrap();
        let overrides = RunOverrides {
            dt: None,
            t_end: Some(0.5),
        };
        let out = run_project(&project, &overrides, "\t").unwrap();
        let labels = out.telemetry_labels.split('\t').count();
        assert!(labels > 1);
        assert_eq!(labels, out.telemetry_values.split('\t').count());
    }

    #[test]
    fn finite_fuel_is_drawn_down() {
        let mut project = from_yaml_str(GROUND_START).unwrap();
        project.run.fuel_lbs = Some(50.0);
        let out = run_project(&project, &RunOverrides::default(), ",").unwrap();
        let left = out.fuel_remaining_lbs.unwrap();
        assert!(left < 50.0);
        assert!((50.0 - left - out.record.fuel_burned_lbs).abs() < 1e-9);
    }
}
