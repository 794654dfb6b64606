//! Build runtime engine structures from project definitions.
//!
//! Mirrors the project schema one-to-one: engine definition to constants and
//! thrust curves, ambient block to [`Ambient`], run block to [`RunOptions`]
//! and the control list to a [`ControlSchedule`].

use gt_engine::{
    Ambient, AugMethod, ControlAction, ControlEvent, ControlSchedule, EngineConstants,
    EngineObserver, FaultLimits, RunOptions, ThrustCurves, Turbine,
};
use gt_project::{
    ActionDef, AmbientDef, AugMethodDef, ControlDef, CurveDef, EngineDef, LimitsDef, RunDef,
    TablesDef,
};
use gt_tables::{Axis, ConstantCurve, Curve, FlightConditions, Table1D, Table2D};

use crate::error::{AppError, AppResult};

/// Static constants for an engine definition, all forces in lbf.
pub fn build_constants(def: &EngineDef) -> EngineConstants {
    let mil_thrust_lbf = def.mil_thrust.to_lbf();
    let mut constants = EngineConstants::new(
        def.name.clone(),
        mil_thrust_lbf,
        def.tsfc,
        def.idle_n1,
        def.idle_n2,
        def.max_n1,
        def.max_n2,
    );
    constants.max_thrust_lbf = def
        .max_thrust
        .map_or(mil_thrust_lbf, |max| max.to_lbf());
    constants.bypass_ratio = def.bypass_ratio;
    constants.bleed = def.bleed;
    constants.atsfc = def.atsfc;
    constants.n1_spinup = def.n1_spinup;
    constants.n2_spinup = def.n2_spinup;
    constants.augmented = def.augmented;
    constants.aug_method = aug_method(def.aug_method);
    constants.injected = def.injected;
    constants.injection_time_s = def.injection_time;
    constants.injection_n1_increment = def.injection_n1_increment;
    constants.injection_n2_increment = def.injection_n2_increment;
    constants.reverser_factor = def.reverser_factor;
    constants.limits = fault_limits(&def.limits);
    constants
}

fn aug_method(def: AugMethodDef) -> AugMethod {
    match def {
        AugMethodDef::Property => AugMethod::Property,
        AugMethodDef::ThrottleDetent => AugMethod::ThrottleDetent,
        AugMethodDef::ExtendedRange => AugMethod::ExtendedRange,
    }
}

fn fault_limits(def: &LimitsDef) -> FaultLimits {
    FaultLimits {
        egt_limit_degc: def.egt_limit_degc,
        stall_delay_s: def.stall_delay_s,
        fire_delay_s: def.fire_delay_s,
        seize_delay_s: def.seize_delay_s,
        overspeed_n2: def.overspeed_n2,
    }
}

/// Build one thrust curve.
///
/// # Errors
/// Fails if table breakpoints are not strictly increasing or the value
/// counts do not match them.
pub fn build_curve(def: &CurveDef) -> AppResult<Box<dyn Curve>> {
    let curve: Box<dyn Curve> = match def {
        CurveDef::Constant { value } => Box::new(ConstantCurve(*value)),
        CurveDef::Mach { mach, values } => {
            Box::new(Table1D::new(Axis::Mach, mach.clone(), values.clone())?)
        }
        CurveDef::Altitude {
            altitude_ft,
            values,
        } => Box::new(Table1D::new(
            Axis::AltitudeFt,
            altitude_ft.clone(),
            values.clone(),
        )?),
        CurveDef::MachAltitude {
            mach,
            altitude_ft,
            values,
        } => Box::new(Table2D::new(
            mach.clone(),
            altitude_ft.clone(),
            values.clone(),
        )?),
    };
    Ok(curve)
}

pub fn build_curves(def: &TablesDef) -> AppResult<ThrustCurves> {
    let mut curves = ThrustCurves::new(build_curve(&def.idle)?, build_curve(&def.mil)?);
    if let Some(max) = &def.max {
        curves = curves.with_max(build_curve(max)?);
    }
    if let Some(injection) = &def.injection {
        curves = curves.with_injection(build_curve(injection)?);
    }
    Ok(curves)
}

/// Build an engine reporting its events through `tracing`.
pub fn build_engine(def: &EngineDef) -> AppResult<Turbine> {
    let engine = Turbine::new(build_constants(def), build_curves(&def.tables)?)?;
    Ok(engine)
}

/// Build an engine with a caller-supplied observer.
pub fn build_engine_with<O: EngineObserver>(def: &EngineDef, observer: O) -> AppResult<Turbine<O>> {
    let engine = Turbine::with_observer(build_constants(def), build_curves(&def.tables)?, observer)?;
    Ok(engine)
}

pub fn build_ambient(def: &AmbientDef) -> Ambient {
    Ambient::new(
        def.tat_degc,
        def.qbar_psf,
        FlightConditions::new(def.mach, def.altitude_ft),
    )
}

pub fn build_run_options(def: &RunDef) -> RunOptions {
    RunOptions {
        dt: def.dt,
        t_end: def.t_end,
        max_steps: def.max_steps,
        record_every: def.record_every,
        start_running: def.start_running,
    }
}

/// Convert the control list, in file order.
///
/// # Errors
/// Fails if an entry does not name exactly one trigger.
pub fn build_schedule(defs: &[ControlDef]) -> AppResult<ControlSchedule> {
    let mut schedule = ControlSchedule::new();
    for (idx, def) in defs.iter().enumerate() {
        let action = control_action(def.action);
        let event = match (def.at_s, def.when_n2_above) {
            (Some(t_s), None) => ControlEvent::at(t_s, action),
            (None, Some(pct)) => ControlEvent::when_n2_above(pct, action),
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "controls[{idx}] needs exactly one of at_s or when_n2_above"
                )));
            }
        };
        schedule.push(event);
    }
    Ok(schedule)
}

fn control_action(def: ActionDef) -> ControlAction {
    match def {
        ActionDef::Throttle { value } => ControlAction::Throttle(value),
        ActionDef::Starter { on } => ControlAction::Starter(on),
        ActionDef::Cutoff { on } => ControlAction::Cutoff(on),
        ActionDef::Ignition { on } => ControlAction::Ignition(on),
        ActionDef::Augmentation { on } => ControlAction::Augmentation(on),
        ActionDef::Injection { on } => ControlAction::Injection(on),
        ActionDef::Reverser { on } => ControlAction::Reverser(on),
        ActionDef::BleedDemand { value } => ControlAction::BleedDemand(value),
    }
}
