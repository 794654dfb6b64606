//! Smoke test for the gt-app service layer against the bundled scenarios.

use std::path::PathBuf;

use gt_app::{
    EngineSummary, RunOverrides, load_project, run_project, samples_csv, save_project, summarize,
    validate_project,
};
use gt_engine::{EngineEvent, Phase};

fn scenario(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // go to crates
    path.pop(); // go to repo root
    path.push("scenarios");
    path.push(name);
    path
}

#[test]
fn bundled_scenarios_load_and_validate() {
    for name in [
        "j85_ground_start.yaml",
        "turbofan_climb.yaml",
        "water_injection.json",
    ] {
        let project = load_project(&scenario(name)).expect("Failed to load scenario");
        validate_project(&project).expect("Validation should succeed");
    }
}

#[test]
fn summary_reports_derived_figures() {
    let project = load_project(&scenario("j85_ground_start.yaml")).unwrap();
    let EngineSummary {
        name,
        max_thrust_lbf,
        spool_rate_pct_s,
        augmented,
        control_count,
        ..
    } = summarize(&project);
    assert_eq!(name, "J85");
    assert_eq!(max_thrust_lbf, 3850.0);
    assert!((spool_rate_pct_s - 30.0).abs() < 1e-12);
    assert!(augmented);
    assert_eq!(control_count, 4);
}

#[test]
fn ground_start_scenario_ends_running() {
    let project = load_project(&scenario("j85_ground_start.yaml")).unwrap();
    let out = run_project(&project, &RunOverrides::default(), ",").unwrap();

    assert_eq!(out.final_phase, Phase::Run);
    assert!(out.faults.is_empty(), "unexpected faults: {:?}", out.faults);
    let phases = out.record.phases();
    assert_eq!(phases.first(), Some(&Phase::Trim));
    assert!(phases.contains(&Phase::Start));
    assert!(out.record.last().unwrap().thrust_lbf > 0.0);

    let csv = samples_csv(&out.record, ",");
    assert_eq!(csv.lines().count(), out.record.samples.len() + 1);
}

#[test]
fn water_injection_scenario_runs_dry() {
    let project = load_project(&scenario("water_injection.json")).unwrap();
    let out = run_project(&project, &RunOverrides::default(), ",").unwrap();

    assert!(out.events.contains(&EngineEvent::InjectionExhausted));
    let left = out.fuel_remaining_lbs.expect("scenario carries a fuel load");
    assert!(left > 0.0 && left < 200.0);
}

#[test]
fn turbofan_scenario_holds_run() {
    let project = load_project(&scenario("turbofan_climb.yaml")).unwrap();
    let out = run_project(&project, &RunOverrides::default(), ",").unwrap();
    assert_eq!(out.final_phase, Phase::Run);
    assert!(out.faults.is_empty());
}

#[test]
fn saved_project_reloads() {
    let project = load_project(&scenario("turbofan_climb.yaml")).unwrap();
    let dir = std::env::temp_dir();
    let path = dir.join(format!("gt_app_smoke_{}.json", std::process::id()));
    save_project(&path, &project).unwrap();
    let reloaded = load_project(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(reloaded, project);
}
