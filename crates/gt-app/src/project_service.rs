//! Project loading, saving, validation, and introspection.

use std::path::Path;

use gt_engine::AugMethod;
use gt_project::ProjectError;
use gt_project::schema::Project;
use serde::Serialize;

use crate::engine_build::{build_constants, build_curves};
use crate::error::{AppError, AppResult};

/// Derived engine figures for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSummary {
    pub name: String,
    pub mil_thrust_lbf: f64,
    pub max_thrust_lbf: f64,
    pub bypass_ratio: f64,
    /// Idle to full throttle spool rate (%/s)
    pub spool_rate_pct_s: f64,
    pub idle_fuel_flow_pph: f64,
    pub augmented: bool,
    pub aug_method: Option<AugMethod>,
    pub injected: bool,
    pub control_count: usize,
}

/// Load a project file; `.json` files as JSON, anything else as YAML.
pub fn load_project(path: &Path) -> AppResult<Project> {
    gt_project::load(path).map_err(|e| match e {
        ProjectError::Io(source) => AppError::ProjectFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

/// Save a project, choosing the format from the file extension.
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let result = if is_json {
        gt_project::save_json(path, project)
    } else {
        gt_project::save_yaml(path, project)
    };
    result.map_err(|e| match e {
        ProjectError::Io(source) => AppError::FileWrite {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

/// Validate the schema rules and that the engine can actually be built.
pub fn validate_project(project: &Project) -> AppResult<()> {
    gt_project::validate_project(project)?;
    let constants = build_constants(&project.engine);
    constants.validate()?;
    build_curves(&project.engine.tables)?.validate(&constants)?;
    Ok(())
}

pub fn summarize(project: &Project) -> EngineSummary {
    let c = build_constants(&project.engine);
    EngineSummary {
        name: c.name.clone(),
        mil_thrust_lbf: c.mil_thrust_lbf,
        max_thrust_lbf: c.max_thrust_lbf,
        bypass_ratio: c.bypass_ratio,
        spool_rate_pct_s: c.delay(),
        idle_fuel_flow_pph: c.idle_fuel_flow_pph(),
        augmented: c.augmented,
        aug_method: c.augmented.then_some(c.aug_method),
        injected: c.injected,
        control_count: project.controls.len(),
    }
}
