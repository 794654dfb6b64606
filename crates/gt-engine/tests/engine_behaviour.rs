use gt_engine::{
    Ambient, AugMethod, ControlAction, ControlEvent, ControlSchedule, EngineConstants,
    EngineEvent, EventLog, Fault, FaultLimits, Phase, RunOptions, TelemetryColumn, ThrustCurves,
    Turbine, UnlimitedFuel, run,
};
use gt_core::{Tolerances, nearly_equal};
use gt_tables::{ConstantCurve, FlightConditions, FnCurve};
use proptest::prelude::*;

const THRUST_TOL: Tolerances = Tolerances {
    abs: 1e-6,
    rel: 0.0,
};

fn ten_thousand_pound() -> EngineConstants {
    EngineConstants::new("TJ10", 10_000.0, 0.8, 15.0, 60.0, 100.0, 100.0)
}

fn build(constants: EngineConstants, curves: ThrustCurves) -> Turbine<EventLog> {
    Turbine::with_observer(constants, curves, EventLog::new()).unwrap()
}

fn dry_engine() -> Turbine<EventLog> {
    build(ten_thousand_pound(), ThrustCurves::constant(0.03, 1.0))
}

fn augmented(method: AugMethod) -> Turbine<EventLog> {
    let mut c = ten_thousand_pound();
    c.augmented = true;
    c.aug_method = method;
    c.max_thrust_lbf = 15_000.0;
    let curves = ThrustCurves::constant(0.03, 1.0).with_max(Box::new(ConstantCurve(1.0)));
    build(c, curves)
}

fn start_schedule() -> ControlSchedule {
    ControlSchedule::new()
        .with(ControlEvent::at(0.0, ControlAction::Starter(true)))
        .with(ControlEvent::when_n2_above(15.0, ControlAction::Cutoff(false)))
}

fn settle(engine: &mut Turbine<EventLog>, ambient: &Ambient, seconds: f64) {
    let dt = 1.0 / 120.0;
    let frames = (seconds / dt).round() as usize;
    for _ in 0..frames {
        engine.calculate(ambient, dt);
    }
}

#[test]
fn ground_start_reaches_idle_within_spool_delay() {
    let mut engine = dry_engine();
    let ambient = Ambient::sea_level();
    let opts = RunOptions {
        dt: 1.0 / 120.0,
        t_end: engine.constants().delay(),
        ..RunOptions::default()
    };

    run(&mut engine, &ambient, &start_schedule(), &opts).unwrap();

    assert_eq!(engine.phase(), Phase::Run);
    assert!(nearly_equal(engine.n2(), 60.0, THRUST_TOL), "N2 = {}", engine.n2());
    assert!(engine.fuel_flow_pph() > 0.0);
    assert!(!engine.stalled() && !engine.seized() && !engine.overtemp() && !engine.fire());
    assert!(!engine.starter(), "starter disengages once running");
    assert_eq!(
        engine.observer().phases_entered(),
        vec![Phase::Off, Phase::SpinUp, Phase::Start, Phase::Run]
    );
}

#[test]
fn start_sequence_is_deterministic() {
    let ambient = Ambient::sea_level();
    let opts = RunOptions {
        t_end: 40.0,
        record_every: 1,
        ..RunOptions::default()
    };

    let mut a = dry_engine();
    let mut b = dry_engine();
    let rec_a = run(&mut a, &ambient, &start_schedule(), &opts).unwrap();
    let rec_b = run(&mut b, &ambient, &start_schedule(), &opts).unwrap();

    assert_eq!(rec_a, rec_b);
    assert_eq!(a.observer().events(), b.observer().events());
    assert_eq!(
        rec_a.phases(),
        vec![Phase::Trim, Phase::SpinUp, Phase::Start, Phase::Run]
    );
}

#[test]
fn no_fuel_while_unlit_or_cut_off() {
    let ambient = Ambient::sea_level();
    let mut engine = dry_engine();

    // Off
    engine.calculate(&ambient, 0.01);
    assert_eq!(engine.phase(), Phase::Off);
    assert_eq!(engine.fuel_flow_pph(), 0.0);

    // SpinUp
    engine.set_starter(true);
    settle(&mut engine, &ambient, 1.0);
    assert_eq!(engine.phase(), Phase::SpinUp);
    assert_eq!(engine.fuel_flow_pph(), 0.0);

    // Cutoff while running
    engine.set_starter(false);
    engine.init_running(&UnlimitedFuel, &ambient).unwrap();
    assert!(engine.fuel_flow_pph() > 0.0);
    engine.set_cutoff(true);
    engine.calculate(&ambient, 0.01);
    assert_eq!(engine.fuel_flow_pph(), 0.0);
    assert_eq!(engine.calc_fuel_need(), 0.0);

    // Seize
    engine.set_phase(Phase::Seize);
    engine.set_cutoff(false);
    engine.calculate(&ambient, 0.01);
    assert_eq!(engine.fuel_flow_pph(), 0.0);
}

#[test]
fn steady_fuel_flow_rises_with_throttle() {
    let ambient = Ambient::sea_level();
    let mut previous = 0.0;
    for step in 0..=10 {
        let throttle = f64::from(step) / 10.0;
        let mut engine = dry_engine();
        engine.set_throttle(throttle);
        engine.init_running(&UnlimitedFuel, &ambient).unwrap();
        settle(&mut engine, &ambient, 2.0);

        assert_eq!(engine.phase(), Phase::Run);
        let flow = engine.fuel_flow_pph();
        assert!(
            flow > previous,
            "flow {flow} at throttle {throttle} not above {previous}"
        );
        previous = flow;
    }
}

#[test]
fn seizure_holds_until_reset() {
    let ambient = Ambient {
        qbar_psf: 400.0,
        ..Ambient::sea_level()
    };
    let mut engine = dry_engine();
    engine.init_running(&UnlimitedFuel, &ambient).unwrap();
    engine.set_phase(Phase::Seize);

    let inputs: [fn(&mut Turbine<EventLog>); 4] = [
        |e| e.set_throttle(1.0),
        |e| e.set_starter(true),
        |e| e.set_cutoff(true),
        |e| e.set_cutoff(false),
    ];
    for input in inputs {
        input(&mut engine);
        settle(&mut engine, &ambient, 0.5);
        assert!(engine.seized());
        assert_eq!(engine.phase(), Phase::Seize);
        assert_eq!(engine.n2(), 0.0);
    }
    assert!(engine.init_running(&UnlimitedFuel, &ambient).is_err());

    engine.reset_to_ic();
    assert!(!engine.seized());
    assert_eq!(engine.phase(), Phase::Trim);
    assert_eq!(engine.observer().events().last(), Some(&EngineEvent::Reset));
}

#[test]
fn reset_then_init_is_repeatable() {
    let ambient = Ambient::sea_level();
    let mut engine = dry_engine();

    let trace = |engine: &mut Turbine<EventLog>| {
        engine.reset_to_ic();
        engine.set_throttle(0.7);
        engine.init_running(&UnlimitedFuel, &ambient).unwrap();
        let mut out = Vec::new();
        for i in 0..240 {
            if i == 120 {
                engine.set_throttle(0.2);
            }
            engine.calculate(&ambient, 1.0 / 120.0);
            out.push(engine.state().clone());
        }
        out
    };

    // dirty the engine first
    engine.set_phase(Phase::Stall);
    let first = trace(&mut engine);
    let second = trace(&mut engine);
    assert_eq!(first, second);
}

#[test]
fn afterburner_adds_thrust_for_each_method() {
    let ambient = Ambient::sea_level();

    let mut prop = augmented(AugMethod::Property);
    prop.set_throttle(1.0);
    prop.init_running(&UnlimitedFuel, &ambient).unwrap();
    let dry = prop.calculate(&ambient, 0.01);
    let dry_flow = prop.fuel_flow_pph();
    prop.set_augmentation(true);
    let wet = prop.calculate(&ambient, 0.01);
    assert!(wet > dry);
    assert!(nearly_equal(wet, 15_000.0, THRUST_TOL));
    assert!(prop.fuel_flow_pph() > dry_flow);

    let mut detent = augmented(AugMethod::ThrottleDetent);
    detent.set_throttle(1.0);
    detent.init_running(&UnlimitedFuel, &ambient).unwrap();
    detent.calculate(&ambient, 0.01);
    assert!(detent.augmentation());
    assert!(detent.thrust_lbf() > dry);

    let mut extended = augmented(AugMethod::ExtendedRange);
    extended.set_throttle(1.0);
    extended.init_running(&UnlimitedFuel, &ambient).unwrap();
    let full_dry = extended.calculate(&ambient, 0.01);
    extended.set_throttle(1.5);
    assert!((extended.augment_cmd() - 0.5).abs() < 1e-12);
    let half_wet = extended.calculate(&ambient, 0.01);
    assert!(half_wet > full_dry);
    assert!((half_wet - 12_500.0).abs() < 1.0);
}

#[test]
fn afterburner_ignored_when_not_installed() {
    let ambient = Ambient::sea_level();
    let mut engine = dry_engine();
    engine.set_throttle(1.0);
    engine.init_running(&UnlimitedFuel, &ambient).unwrap();
    let dry = engine.calculate(&ambient, 0.01);
    engine.set_augmentation(true);
    assert_eq!(engine.calculate(&ambient, 0.01), dry);
    assert!(!engine.augmentation());
}

#[test]
fn water_injection_runs_out() {
    let mut c = ten_thousand_pound();
    c.injected = true;
    c.injection_time_s = 2.0;
    c.injection_n2_increment = 2.0;
    let curves = ThrustCurves::constant(0.03, 1.0).with_injection(Box::new(ConstantCurve(1.1)));
    let mut engine = build(c, curves);
    let ambient = Ambient::sea_level();
    engine.set_throttle(1.0);
    engine.init_running(&UnlimitedFuel, &ambient).unwrap();
    let dry = engine.calculate(&ambient, 0.01);

    engine.set_injection(true);
    let wet = engine.calculate(&ambient, 0.01);
    assert!(wet > dry * 1.05);
    assert!(engine.injection_timer_s() < 2.0);

    settle(&mut engine, &ambient, 1.0);
    assert!(engine.injection());
    assert!(engine.n2() > 100.0, "injection raises the N2 ceiling");

    settle(&mut engine, &ambient, 3.0);
    assert!(!engine.injection());
    assert_eq!(engine.injection_timer_s(), 0.0);
    let exhausted = engine
        .observer()
        .events()
        .iter()
        .filter(|e| **e == EngineEvent::InjectionExhausted)
        .count();
    assert_eq!(exhausted, 1);

    // no water left: the request is refused
    engine.set_injection(true);
    assert!(!engine.injection());

    engine.reset_to_ic();
    assert_eq!(engine.injection_timer_s(), 2.0);
}

#[test]
fn full_throttle_injection_stays_below_overspeed() {
    let mut c = ten_thousand_pound();
    c.injected = true;
    c.injection_n2_increment = 6.0;
    c.limits.overspeed_n2 = 110.0;
    let curves = ThrustCurves::constant(0.03, 1.0).with_injection(Box::new(ConstantCurve(1.1)));
    let mut engine = build(c, curves);
    let ambient = Ambient::sea_level();
    engine.set_throttle(1.0);
    engine.init_running(&UnlimitedFuel, &ambient).unwrap();
    engine.set_injection(true);

    for _ in 0..300 {
        engine.calculate(&ambient, 0.01);
        assert!(!engine.seized(), "N2 = {}", engine.n2());
    }
    assert_eq!(engine.phase(), Phase::Run);
    assert!(engine.injection());
    assert!(nearly_equal(engine.n2(), 106.0, THRUST_TOL), "N2 = {}", engine.n2());
}

#[test]
fn overtemp_escalates_to_stall_fire_and_seizure() {
    let mut c = ten_thousand_pound();
    c.limits = FaultLimits {
        egt_limit_degc: 600.0,
        ..FaultLimits::default()
    };
    let mut engine = build(c, ThrustCurves::constant(0.03, 1.0));
    let ambient = Ambient::sea_level();
    engine.set_throttle(1.0);
    engine.init_running(&UnlimitedFuel, &ambient).unwrap();

    settle(&mut engine, &ambient, 1.0);
    assert!(engine.overtemp());
    assert!(!engine.stalled());

    settle(&mut engine, &ambient, 2.0);
    assert!(engine.stalled());
    assert_eq!(engine.phase(), Phase::Stall);

    settle(&mut engine, &ambient, 24.0);
    assert!(engine.fire());
    assert!(engine.seized());
    assert_eq!(engine.phase(), Phase::Seize);
    assert_eq!(
        engine.observer().faults_raised(),
        vec![Fault::Overtemp, Fault::Stall, Fault::Fire, Fault::Seizure]
    );
}

#[test]
fn telemetry_labels_and_values_line_up() {
    let ambient = Ambient::sea_level();
    let mut engine = dry_engine().with_engine_number(2);
    engine.init_running(&UnlimitedFuel, &ambient).unwrap();
    engine.calculate(&ambient, 0.01);

    let labels = engine.engine_labels(",");
    let values = engine.engine_values(",");
    let labels: Vec<&str> = labels.split(',').collect();
    let values: Vec<&str> = values.split(',').collect();
    assert_eq!(labels.len(), TelemetryColumn::ALL.len());
    assert_eq!(labels.len(), values.len());
    assert_eq!(labels[0], "TJ10 N1 (engine 2)");

    let phase_col = TelemetryColumn::ALL
        .iter()
        .position(|c| *c == TelemetryColumn::Phase)
        .unwrap();
    assert_eq!(values[phase_col], "Run");

    let tabbed = engine.engine_values("\t");
    assert_eq!(tabbed.split('\t').count(), values.len());
}

#[test]
fn mil_curve_follows_flight_condition() {
    let curves = ThrustCurves::new(
        Box::new(ConstantCurve(0.03)),
        Box::new(FnCurve(|fc: &FlightConditions| 1.0 + 0.25 * fc.mach)),
    );
    let mut engine = build(ten_thousand_pound(), curves);
    engine.set_throttle(1.0);

    engine.init_running(&UnlimitedFuel, &Ambient::sea_level()).unwrap();
    let static_thrust = engine.thrust_lbf();
    let cruise = Ambient::new(15.0, 0.0, FlightConditions::new(0.8, 0.0));
    engine.init_running(&UnlimitedFuel, &cruise).unwrap();
    assert!(engine.thrust_lbf() > static_thrust);
}

#[test]
fn reverser_flips_sign() {
    let ambient = Ambient::sea_level();
    let mut engine = dry_engine();
    engine.set_throttle(0.6);
    engine.init_running(&UnlimitedFuel, &ambient).unwrap();
    let forward = engine.calculate(&ambient, 0.01);
    engine.set_reverse(true);
    let reverse = engine.calculate(&ambient, 0.01);
    assert!(forward > 0.0);
    assert!(reverse < 0.0);
    assert!((reverse + 0.5 * forward).abs() < 1.0);
}

proptest! {
    #[test]
    fn spools_respect_rate_limits(
        throttles in prop::collection::vec(0.0f64..1.0, 1..40),
        dt in 0.001f64..0.1,
    ) {
        let ambient = Ambient::sea_level();
        let mut engine = dry_engine();
        engine.init_running(&UnlimitedFuel, &ambient).unwrap();
        let delay = engine.constants().delay();

        for t in throttles {
            engine.set_throttle(t);
            for _ in 0..5 {
                let (n1, n2) = (engine.n1(), engine.n2());
                engine.calculate(&ambient, dt);
                prop_assert!((engine.n2() - n2).abs() <= 3.0 * delay * dt + 1e-9);
                prop_assert!((engine.n1() - n1).abs() <= 2.4 * delay * dt + 1e-9);
                prop_assert!(engine.n2() >= 0.0 && engine.n2() <= 100.0 + 1e-9);
                prop_assert!(engine.n1() >= 0.0 && engine.n1() <= 100.0 + 1e-9);
            }
        }
    }
}
