//! Project validation logic.

use crate::schema::{ControlDef, CurveDef, EngineDef, LATEST_VERSION, Project, RunDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing table: {table} ({reason})")]
    MissingTable { table: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    validate_engine(&project.engine)?;

    let ambient = &project.ambient;
    finite("ambient tat_degc", ambient.tat_degc)?;
    non_negative("ambient qbar_psf", ambient.qbar_psf)?;
    non_negative("ambient mach", ambient.mach)?;
    finite("ambient altitude_ft", ambient.altitude_ft)?;

    validate_run(&project.run)?;
    for (idx, control) in project.controls.iter().enumerate() {
        validate_control(idx, control)?;
    }
    Ok(())
}

pub fn validate_engine(engine: &EngineDef) -> Result<(), ValidationError> {
    let name = &engine.name;
    if name.trim().is_empty() {
        return Err(invalid("engine name", name, "must not be empty"));
    }

    positive("milthrust", engine.mil_thrust.value)?;
    positive("tsfc", engine.tsfc)?;
    non_negative("bypassratio", engine.bypass_ratio)?;
    unit_interval("bleed", engine.bleed)?;
    unit_interval("reverserfactor", engine.reverser_factor)?;
    non_negative("idlen1", engine.idle_n1)?;
    non_negative("idlen2", engine.idle_n2)?;
    positive("n1spinup", engine.n1_spinup)?;
    positive("n2spinup", engine.n2_spinup)?;
    non_negative("injn1increment", engine.injection_n1_increment)?;
    non_negative("injn2increment", engine.injection_n2_increment)?;

    if !engine.max_n1.is_finite() || engine.max_n1 <= engine.idle_n1 {
        return Err(invalid("maxn1", engine.max_n1, "must exceed idlen1"));
    }
    if !engine.max_n2.is_finite() || engine.max_n2 <= engine.idle_n2 {
        return Err(invalid("maxn2", engine.max_n2, "must exceed idlen2"));
    }

    if engine.augmented {
        positive("atsfc", engine.atsfc)?;
        let max = engine
            .max_thrust
            .ok_or_else(|| invalid("maxthrust", "none", "required when augmented"))?;
        positive("maxthrust", max.value)?;
        if max.to_lbf() < engine.mil_thrust.to_lbf() {
            return Err(invalid(
                "maxthrust",
                max.value,
                "must be at least milthrust",
            ));
        }
        if engine.tables.max.is_none() {
            return Err(ValidationError::MissingTable {
                table: "max".to_string(),
                reason: "required when augmented".to_string(),
            });
        }
    }
    if engine.injected {
        positive("injection_time", engine.injection_time)?;
        if engine.tables.injection.is_none() {
            return Err(ValidationError::MissingTable {
                table: "injection".to_string(),
                reason: "required when injected".to_string(),
            });
        }
    }

    let limits = &engine.limits;
    positive("limits egt_limit_degc", limits.egt_limit_degc)?;
    non_negative("limits stall_delay_s", limits.stall_delay_s)?;
    non_negative("limits fire_delay_s", limits.fire_delay_s)?;
    non_negative("limits seize_delay_s", limits.seize_delay_s)?;
    let n2_ceiling = if engine.injected {
        engine.max_n2 + engine.injection_n2_increment
    } else {
        engine.max_n2
    };
    if !limits.overspeed_n2.is_finite() || limits.overspeed_n2 < n2_ceiling {
        return Err(invalid(
            "limits overspeed_n2",
            limits.overspeed_n2,
            "must be at or above maxn2 plus injn2increment",
        ));
    }

    validate_curve("idle", &engine.tables.idle)?;
    validate_curve("mil", &engine.tables.mil)?;
    if let Some(curve) = &engine.tables.max {
        validate_curve("max", curve)?;
    }
    if let Some(curve) = &engine.tables.injection {
        validate_curve("injection", curve)?;
    }
    Ok(())
}

fn validate_curve(table: &str, curve: &CurveDef) -> Result<(), ValidationError> {
    match curve {
        CurveDef::Constant { value } => finite(&format!("table {table} value"), *value),
        CurveDef::Mach { mach, values } => {
            breakpoints(&format!("table {table} mach"), mach)?;
            same_len(table, mach.len(), values.len())?;
            all_finite(table, values)
        }
        CurveDef::Altitude {
            altitude_ft,
            values,
        } => {
            breakpoints(&format!("table {table} altitude_ft"), altitude_ft)?;
            same_len(table, altitude_ft.len(), values.len())?;
            all_finite(table, values)
        }
        CurveDef::MachAltitude {
            mach,
            altitude_ft,
            values,
        } => {
            breakpoints(&format!("table {table} mach"), mach)?;
            breakpoints(&format!("table {table} altitude_ft"), altitude_ft)?;
            same_len(table, mach.len(), values.len())?;
            for row in values {
                same_len(table, altitude_ft.len(), row.len())?;
                all_finite(table, row)?;
            }
            Ok(())
        }
    }
}

fn breakpoints(field: &str, xs: &[f64]) -> Result<(), ValidationError> {
    if xs.len() < 2 {
        return Err(invalid(field, xs.len(), "need at least 2 breakpoints"));
    }
    if xs.iter().any(|x| !x.is_finite()) || xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(invalid(
            field,
            format!("{xs:?}"),
            "breakpoints must be finite and strictly increasing",
        ));
    }
    Ok(())
}

fn same_len(table: &str, expected: usize, got: usize) -> Result<(), ValidationError> {
    if expected != got {
        return Err(invalid(
            &format!("table {table} values"),
            got,
            &format!("expected {expected} entries to match breakpoints"),
        ));
    }
    Ok(())
}

fn all_finite(table: &str, values: &[f64]) -> Result<(), ValidationError> {
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(invalid(&format!("table {table} values"), v, "must be finite"));
    }
    Ok(())
}

fn validate_run(run: &RunDef) -> Result<(), ValidationError> {
    positive("run dt", run.dt)?;
    non_negative("run t_end", run.t_end)?;
    if run.record_every == 0 {
        return Err(invalid("run record_every", run.record_every, "must be positive"));
    }
    if run.max_steps == 0 {
        return Err(invalid("run max_steps", run.max_steps, "must be positive"));
    }
    if !run.throttle.is_finite() || !(0.0..=2.0).contains(&run.throttle) {
        return Err(invalid("run throttle", run.throttle, "must be in [0, 2]"));
    }
    if let Some(fuel) = run.fuel_lbs {
        non_negative("run fuel_lbs", fuel)?;
    }
    Ok(())
}

fn validate_control(idx: usize, control: &ControlDef) -> Result<(), ValidationError> {
    let field = format!("controls[{idx}]");
    match (control.at_s, control.when_n2_above) {
        (Some(t), None) => non_negative(&format!("{field} at_s"), t),
        (None, Some(pct)) => non_negative(&format!("{field} when_n2_above"), pct),
        _ => Err(invalid(
            &field,
            "trigger",
            "exactly one of at_s or when_n2_above is required",
        )),
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, v: f64) -> Result<(), ValidationError> {
    if !v.is_finite() {
        return Err(invalid(field, v, "must be finite"));
    }
    Ok(())
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if !v.is_finite() || v <= 0.0 {
        return Err(invalid(field, v, "must be positive and finite"));
    }
    Ok(())
}

fn non_negative(field: &str, v: f64) -> Result<(), ValidationError> {
    if !v.is_finite() || v < 0.0 {
        return Err(invalid(field, v, "must be non-negative and finite"));
    }
    Ok(())
}

fn unit_interval(field: &str, v: f64) -> Result<(), ValidationError> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(invalid(field, v, "must be in [0, 1]"));
    }
    Ok(())
}
