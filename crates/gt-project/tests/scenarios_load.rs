use std::path::Path;

#[test]
fn scenarios_load_and_validate() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios");
    let scenarios = [
        "j85_ground_start.yaml",
        "turbofan_climb.yaml",
        "water_injection.json",
    ];

    for name in scenarios {
        let path = root.join(name);
        let project = gt_project::load(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        gt_project::validate_project(&project)
            .unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
    }
}

#[test]
fn newton_rated_engine_converts() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios/turbofan_climb.yaml");
    let project = gt_project::load_yaml(&path).unwrap();
    let lbf = project.engine.mil_thrust.to_lbf();
    assert!((lbf - 9_300.3).abs() < 0.5, "got {lbf}");
    assert!(project.run.start_running);
}
