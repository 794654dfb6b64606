//! Turbine state machine and per-tick calculation pipeline.
//!
//! Each call to [`Turbine::calculate`] selects the phase for this frame from
//! the control inputs, runs exactly one phase handler, then computes fuel
//! flow, advances the fault monitor and applies the thrust reverser.

use crate::ambient::Ambient;
use crate::constants::{AugMethod, EngineConstants, ThrustCurves};
use crate::error::{EngineResult, InitError};
use crate::faults::{Fault, FaultInputs, FaultState};
use crate::fuel::{self, FuelDemand, FuelSupply};
use crate::observer::{EngineEvent, EngineObserver, TracingObserver};
use crate::phase::Phase;
use crate::telemetry;
use gt_controls::{ActuatorState, PositionActuator, RateLimits, seek};
use gt_core::constants::ISA_SL_DEGC;
use gt_core::{clamp_input, k, temp_degf};
use gt_tables::FlightConditions;
use tracing::debug;

/// N2 (%) at which the combustor can light.
const LIGHT_OFF_N2: f64 = 15.0;
const SPINUP_N1: f64 = 5.21;
const SPINUP_N2: f64 = 25.18;
/// Dynamic pressure (psf) above which ram air can turn the engine for a start.
const AIR_START_QBAR_PSF: f64 = 30.0;
const START_N1_RATE_RATIO: f64 = 0.7;
const N1_DECEL_RATIO: f64 = 2.4;
const N2_DECEL_RATIO: f64 = 3.0;
/// Smallest windmill spin-up rate (%/s) so a stopped rotor can start turning.
const WINDMILL_MIN_RATE: f64 = 1.0;
const IDLE_EGT_RISE_DEGC: f64 = 363.1;
const THROTTLE_EGT_RISE_DEGC: f64 = 357.1;
const STALL_EGT_RISE_DEGC: f64 = 903.14;
const OIL_PSI_PER_N2: f64 = 0.62;
const OIL_HOT_K: f64 = 366.0;
const OIL_AMBIENT_OFFSET_K: f64 = 273.0;
const STALL_CLEAR_THROTTLE: f64 = 0.01;
const DETENT_THROTTLE: f64 = 0.99;
const DETENT_N2: f64 = 97.0;
const SURGE_HZ: f64 = 1.5;
const THROTTLE_MAX: f64 = 2.0;

const EGT_COOLING: RateLimits = RateLimits::from_rates(11.7, 7.3);
const EGT_LIGHT_OFF: RateLimits = RateLimits::from_rates(21.3, 7.3);
const EGT_RUN: RateLimits = RateLimits::from_rates(100.0, 50.0);
const OIL_TEMP_COLD: RateLimits = RateLimits::symmetric(0.2);
const OIL_TEMP_HOT: RateLimits = RateLimits::from_rates(1.2, 0.1);
const EPR_RATE: RateLimits = RateLimits::symmetric(1.0);
const NOZZLE: PositionActuator = PositionActuator::new(RateLimits::symmetric(0.8));
const INLET: PositionActuator = PositionActuator::new(RateLimits::symmetric(0.5));

/// Mutable engine state. One owner, mutated only by [`Turbine`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    pub phase: Phase,
    /// Fan spool speed (% of max)
    pub n1: f64,
    /// Core spool speed (% of max)
    pub n2: f64,
    /// N2 normalized between idle (0) and max (1)
    pub n2_norm: f64,
    pub egt_degc: f64,
    pub epr: f64,
    pub oil_pressure_psi: f64,
    pub oil_temp_degk: f64,
    pub inlet: ActuatorState,
    pub nozzle: ActuatorState,
    pub faults: FaultState,

    pub throttle_pos: f64,
    /// Afterburner demand from the extended throttle range [0, 1]
    pub augment_cmd: f64,
    pub starter: bool,
    pub cutoff: bool,
    pub ignition: bool,
    pub augmentation: bool,
    pub injection: bool,
    pub reversed: bool,
    pub running: bool,
    pub starved: bool,
    pub bleed_demand: f64,

    /// Water remaining, counted down while injecting (s)
    pub injection_timer_s: f64,
    pub corrected_tsfc: f64,
    pub idle_thrust_lbf: f64,
    /// Dry thrust before bleed losses
    pub dry_thrust_lbf: f64,
    pub aug_extra_lbf: f64,
    /// Thrust before the reverser
    pub gross_thrust_lbf: f64,
    /// Net thrust delivered last frame; negative when reversed
    pub thrust_lbf: f64,
    /// Steady-state thrust at the current throttle
    pub target_thrust_lbf: f64,
    pub fuel_flow_pph: f64,
    pub stall_time_s: f64,
}

impl EngineState {
    /// State at construction and after `reset_to_ic`.
    pub fn baseline(constants: &EngineConstants) -> Self {
        Self {
            phase: Phase::Trim,
            n1: 0.0,
            n2: 0.0,
            n2_norm: 0.0,
            egt_degc: ISA_SL_DEGC,
            epr: 1.0,
            oil_pressure_psi: 0.0,
            oil_temp_degk: ISA_SL_DEGC + OIL_AMBIENT_OFFSET_K,
            inlet: ActuatorState::default(),
            nozzle: ActuatorState::default(),
            faults: FaultState::default(),
            throttle_pos: 0.0,
            augment_cmd: 0.0,
            starter: false,
            cutoff: true,
            ignition: false,
            augmentation: false,
            injection: false,
            reversed: false,
            running: false,
            starved: false,
            bleed_demand: constants.bleed,
            injection_timer_s: constants.injection_time_s,
            corrected_tsfc: constants.tsfc,
            idle_thrust_lbf: 0.0,
            dry_thrust_lbf: 0.0,
            aug_extra_lbf: 0.0,
            gross_thrust_lbf: 0.0,
            thrust_lbf: 0.0,
            target_thrust_lbf: 0.0,
            fuel_flow_pph: 0.0,
            stall_time_s: 0.0,
        }
    }
}

/// Thrust build-up for one evaluation.
#[derive(Debug, Clone, Copy, Default)]
struct ThrustBreakdown {
    idle: f64,
    dry: f64,
    bled: f64,
    aug_extra: f64,
    gross: f64,
}

/// A gas turbine engine.
pub struct Turbine<O: EngineObserver = TracingObserver> {
    constants: EngineConstants,
    curves: ThrustCurves,
    state: EngineState,
    observer: O,
    engine_number: usize,
}

impl Turbine<TracingObserver> {
    /// Build an engine that reports events through `tracing`.
    ///
    /// # Errors
    /// Fails if the constants are inconsistent or a required curve is missing.
    pub fn new(constants: EngineConstants, curves: ThrustCurves) -> EngineResult<Self> {
        let observer = TracingObserver::new(constants.name.clone());
        Self::with_observer(constants, curves, observer)
    }
}

impl<O: EngineObserver> Turbine<O> {
    pub fn with_observer(
        constants: EngineConstants,
        curves: ThrustCurves,
        observer: O,
    ) -> EngineResult<Self> {
        constants.validate()?;
        curves.validate(&constants)?;
        debug!(
            engine = %constants.name,
            mil_thrust_lbf = constants.mil_thrust_lbf,
            augmented = constants.augmented,
            injected = constants.injected,
            "engine constructed"
        );
        let state = EngineState::baseline(&constants);
        Ok(Self {
            constants,
            curves,
            state,
            observer,
            engine_number: 0,
        })
    }

    pub fn with_engine_number(mut self, engine_number: usize) -> Self {
        self.engine_number = engine_number;
        self
    }

    /// Advance the engine by `dt` seconds and return net thrust (lbf).
    ///
    /// A `dt` of zero (or anything not positive and finite) evaluates the
    /// engine in the trim phase without lag.
    pub fn calculate(&mut self, ambient: &Ambient, dt: f64) -> f64 {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.select_phase(ambient, dt);

        let fc = ambient.conditions.with_throttle(self.state.throttle_pos);
        let augmenting = self.constants.augmented && self.state.augmentation;
        let injecting = self.injection_active();
        self.state.target_thrust_lbf = self
            .thrust_at(&fc, self.steady_n2_norm(injecting), augmenting, injecting)
            .gross;
        self.store_breakdown(&ThrustBreakdown::default());

        let gross = match self.state.phase {
            Phase::Off => self.calc_off(ambient, dt),
            Phase::SpinUp => self.calc_spin_up(ambient, dt),
            Phase::Start => self.calc_start(ambient, dt),
            Phase::Run => self.calc_run(ambient, &fc, dt),
            Phase::Stall => self.calc_stall(ambient, &fc, dt),
            Phase::Seize => self.calc_seize(ambient, dt),
            Phase::Trim => self.calc_trim(ambient, &fc),
        };

        self.state.fuel_flow_pph = self.calc_fuel_need();
        if dt > 0.0 {
            self.monitor_faults(dt);
        }
        self.finish(gross)
    }

    /// Pre-dispatch phase selection, in priority order.
    fn select_phase(&mut self, ambient: &Ambient, dt: f64) {
        if dt <= 0.0 {
            if !self.state.faults.seized && !self.state.faults.stalled {
                self.transition(Phase::Trim);
            }
        } else {
            if self.state.phase == Phase::Trim {
                if self.state.running && !self.state.starved {
                    self.place_at_throttle(ambient);
                    self.transition(Phase::Run);
                } else {
                    self.state.cutoff = true;
                    self.state.egt_degc = ambient.tat_degc;
                    self.transition(Phase::Off);
                }
            }

            let s = &self.state;
            if s.phase == Phase::Off && s.starter && s.cutoff {
                self.transition(Phase::SpinUp);
            }

            let s = &self.state;
            let turning = s.starter || ambient.qbar_psf > AIR_START_QBAR_PSF;
            if turning
                && !s.cutoff
                && s.n2 >= LIGHT_OFF_N2
                && !s.running
                && matches!(s.phase, Phase::Off | Phase::SpinUp)
            {
                self.state.starter = false;
                self.transition(Phase::Start);
            }

            let s = &self.state;
            let shut_down = (s.cutoff && s.phase != Phase::SpinUp)
                || (s.starved && s.phase != Phase::SpinUp);
            if shut_down && s.phase != Phase::Off && !s.faults.seized {
                self.clear_fault(Fault::Stall);
                self.transition(Phase::Off);
            }
        }

        if self.state.faults.seized {
            self.transition(Phase::Seize);
        } else if self.state.faults.stalled {
            self.transition(Phase::Stall);
        }
    }

    fn calc_off(&mut self, ambient: &Ambient, dt: f64) -> f64 {
        let s = &mut self.state;
        s.running = false;
        s.augmentation = false;
        s.n2_norm = 0.0;
        s.n1 = windmill(s.n1, ambient.qbar_psf / 10.0, dt);
        s.n2 = windmill(s.n2, ambient.qbar_psf / 15.0, dt);
        s.egt_degc = EGT_COOLING.apply(s.egt_degc, ambient.tat_degc, dt);
        s.oil_temp_degk = OIL_TEMP_COLD.apply(
            s.oil_temp_degk,
            ambient.tat_degc + OIL_AMBIENT_OFFSET_K,
            dt,
        );
        s.oil_pressure_psi = s.n2 * OIL_PSI_PER_N2;
        s.epr = EPR_RATE.apply(s.epr, 1.0, dt);
        s.nozzle = NOZZLE.step(&s.nozzle, dt, 1.0);
        s.inlet = INLET.step(&s.inlet, dt, inlet_command(&ambient.conditions));
        0.0
    }

    fn calc_spin_up(&mut self, ambient: &Ambient, dt: f64) -> f64 {
        if !self.state.starter {
            self.transition(Phase::Off);
            return self.calc_off(ambient, dt);
        }
        let c = &self.constants;
        let s = &mut self.state;
        s.running = false;
        s.n2_norm = 0.0;
        s.n2 = seek(s.n2, SPINUP_N2, c.n2_spinup, s.n2 / 2.0, dt);
        s.n1 = seek(s.n1, SPINUP_N1, c.n1_spinup, s.n1 / 2.0, dt);
        s.egt_degc = EGT_COOLING.apply(s.egt_degc, ambient.tat_degc, dt);
        s.oil_temp_degk = OIL_TEMP_COLD.apply(
            s.oil_temp_degk,
            ambient.tat_degc + OIL_AMBIENT_OFFSET_K,
            dt,
        );
        s.oil_pressure_psi = s.n2 * OIL_PSI_PER_N2;
        s.epr = 1.0;
        s.nozzle = ActuatorState { position: 1.0 };
        s.inlet = INLET.step(&s.inlet, dt, inlet_command(&ambient.conditions));
        0.0
    }

    fn calc_start(&mut self, ambient: &Ambient, dt: f64) -> f64 {
        if self.state.n2 < LIGHT_OFF_N2 {
            self.state.starter = false;
            self.transition(Phase::Off);
            return self.calc_off(ambient, dt);
        }
        let c = &self.constants;
        let s = &mut self.state;
        let rate = c.start_rate();
        s.running = false;
        s.n2_norm = 0.0;
        s.n2 = seek(s.n2, c.idle_n2, rate, s.n2 / 2.0, dt);
        s.n1 = seek(s.n1, c.idle_n1, rate * START_N1_RATE_RATIO, s.n1 / 2.0, dt);
        s.egt_degc = EGT_LIGHT_OFF.apply(
            s.egt_degc,
            ambient.tat_degc + IDLE_EGT_RISE_DEGC,
            dt,
        );
        s.oil_temp_degk = OIL_TEMP_HOT.apply(s.oil_temp_degk, OIL_HOT_K, dt);
        s.oil_pressure_psi = s.n2 * OIL_PSI_PER_N2;
        s.epr = EPR_RATE.apply(s.epr, 1.0, dt);
        s.nozzle = NOZZLE.step(&s.nozzle, dt, 1.0);
        s.inlet = INLET.step(&s.inlet, dt, inlet_command(&ambient.conditions));

        if s.n2 >= c.idle_n2 {
            s.running = true;
            s.starter = false;
            self.transition(Phase::Run);
        }
        0.0
    }

    fn calc_run(&mut self, ambient: &Ambient, fc: &FlightConditions, dt: f64) -> f64 {
        let injecting = self.injection_active();
        let (n1_factor, n2_factor) = self.spool_factors(injecting);
        let augmenting = {
            let c = &self.constants;
            let s = &mut self.state;
            let delay = c.delay();
            let t = s.throttle_pos;
            s.running = true;
            s.n2 = seek(
                s.n2,
                c.idle_n2 + t * n2_factor,
                delay,
                delay * N2_DECEL_RATIO,
                dt,
            );
            s.n1 = seek(
                s.n1,
                c.idle_n1 + t * n1_factor,
                delay,
                delay * N1_DECEL_RATIO,
                dt,
            );
            s.n2_norm = ((s.n2 - c.idle_n2) / c.n2_factor()).max(0.0);
            s.corrected_tsfc = fuel::corrected_tsfc(c.tsfc, ambient.tat_rankine(), s.n2_norm);
            self.update_augmentation()
        };

        let thrust = self.thrust_at(fc, self.state.n2_norm, augmenting, injecting);
        self.store_breakdown(&thrust);

        let mil_thrust = self.constants.mil_thrust_lbf;
        let s = &mut self.state;
        let egt_target = ambient.tat_degc
            + IDLE_EGT_RISE_DEGC
            + s.throttle_pos * THROTTLE_EGT_RISE_DEGC;
        s.egt_degc = EGT_RUN.apply(s.egt_degc, egt_target, dt);
        s.oil_pressure_psi = s.n2 * OIL_PSI_PER_N2;
        s.oil_temp_degk = OIL_TEMP_HOT.apply(s.oil_temp_degk, OIL_HOT_K, dt);
        let nozzle_cmd = if augmenting { 1.0 } else { 1.0 - s.n2_norm };
        s.nozzle = NOZZLE.step(&s.nozzle, dt, nozzle_cmd);
        s.inlet = INLET.step(&s.inlet, dt, inlet_command(fc));
        s.epr = EPR_RATE.apply(s.epr, pressure_ratio(thrust.bled, mil_thrust), dt);

        if injecting {
            self.consume_water(dt);
        }
        thrust.gross
    }

    fn calc_stall(&mut self, ambient: &Ambient, fc: &FlightConditions, dt: f64) -> f64 {
        if self.state.throttle_pos < STALL_CLEAR_THROTTLE {
            self.clear_fault(Fault::Stall);
            self.state.stall_time_s = 0.0;
            self.transition(Phase::Run);
            return self.calc_run(ambient, fc, dt);
        }
        let idle = self.constants.mil_thrust_lbf * self.curves.idle.evaluate(fc);
        let c = &self.constants;
        let s = &mut self.state;
        s.stall_time_s += dt;
        s.egt_degc = ambient.tat_degc + STALL_EGT_RISE_DEGC;
        s.n1 = seek(s.n1, ambient.qbar_psf / 10.0, 0.0, s.n1 / 10.0, dt);
        s.n2 = seek(s.n2, ambient.qbar_psf / 15.0, 0.0, s.n2 / 10.0, dt);
        s.n2_norm = ((s.n2 - c.idle_n2) / c.n2_factor()).clamp(0.0, 1.0);
        s.oil_pressure_psi = s.n2 * OIL_PSI_PER_N2;
        s.augmentation = false;

        let surge = 0.6 + 0.4 * (std::f64::consts::TAU * SURGE_HZ * s.stall_time_s).sin();
        let thrust = (idle * surge).max(0.0);
        self.store_breakdown(&ThrustBreakdown {
            idle,
            dry: idle,
            bled: idle,
            gross: thrust,
            ..ThrustBreakdown::default()
        });
        thrust
    }

    fn calc_seize(&mut self, ambient: &Ambient, dt: f64) -> f64 {
        let s = &mut self.state;
        s.running = false;
        s.augmentation = false;
        s.n2 = 0.0;
        s.n2_norm = 0.0;
        s.n1 = seek(s.n1, ambient.qbar_psf / 20.0, 0.0, s.n1 / 15.0, dt);
        s.oil_pressure_psi = 0.0;
        s.oil_temp_degk = OIL_TEMP_COLD.apply(
            s.oil_temp_degk,
            ambient.tat_degc + OIL_AMBIENT_OFFSET_K,
            dt,
        );
        s.egt_degc = EGT_COOLING.apply(s.egt_degc, ambient.tat_degc, dt);
        s.epr = EPR_RATE.apply(s.epr, 1.0, dt);
        0.0
    }

    fn calc_trim(&mut self, ambient: &Ambient, fc: &FlightConditions) -> f64 {
        if !self.state.running {
            return 0.0;
        }
        self.settle(ambient, fc)
    }

    /// Zero-lag evaluation at the current throttle. Spools are not moved.
    fn settle(&mut self, ambient: &Ambient, fc: &FlightConditions) -> f64 {
        let injecting = self.injection_active();
        let n2_norm = self.steady_n2_norm(injecting);
        self.state.n2_norm = n2_norm;
        self.state.corrected_tsfc =
            fuel::corrected_tsfc(self.constants.tsfc, ambient.tat_rankine(), n2_norm);
        let augmenting = self.update_augmentation();
        let thrust = self.thrust_at(fc, n2_norm, augmenting, injecting);
        self.store_breakdown(&thrust);
        self.state.epr = pressure_ratio(thrust.bled, self.constants.mil_thrust_lbf);
        self.state.nozzle.position = if augmenting {
            1.0
        } else {
            (1.0 - n2_norm).clamp(0.0, 1.0)
        };
        thrust.gross
    }

    /// Put spools, temperatures and oil at their running values for the
    /// current throttle.
    fn place_at_throttle(&mut self, ambient: &Ambient) {
        let injecting = self.injection_active();
        let (n1_factor, n2_factor) = self.spool_factors(injecting);
        let c = &self.constants;
        let s = &mut self.state;
        let t = s.throttle_pos;
        s.n1 = c.idle_n1 + t * n1_factor;
        s.n2 = c.idle_n2 + t * n2_factor;
        s.n2_norm = t * n2_factor / c.n2_factor();
        s.egt_degc = ambient.tat_degc + IDLE_EGT_RISE_DEGC + t * THROTTLE_EGT_RISE_DEGC;
        s.oil_temp_degk = OIL_HOT_K;
        s.oil_pressure_psi = s.n2 * OIL_PSI_PER_N2;
        s.cutoff = false;
        s.starter = false;
        s.running = true;
    }

    /// Normalized N2 the current throttle settles at.
    fn steady_n2_norm(&self, injecting: bool) -> f64 {
        let (_, n2_factor) = self.spool_factors(injecting);
        self.state.throttle_pos * n2_factor / self.constants.n2_factor()
    }

    fn spool_factors(&self, injecting: bool) -> (f64, f64) {
        let c = &self.constants;
        if injecting {
            (
                c.n1_factor() + c.injection_n1_increment,
                c.n2_factor() + c.injection_n2_increment,
            )
        } else {
            (c.n1_factor(), c.n2_factor())
        }
    }

    fn thrust_at(
        &self,
        fc: &FlightConditions,
        n2_norm: f64,
        augmenting: bool,
        injecting: bool,
    ) -> ThrustBreakdown {
        let c = &self.constants;
        let idle = c.mil_thrust_lbf * self.curves.idle.evaluate(fc);
        let mil_span = (c.mil_thrust_lbf - idle) * self.curves.mil.evaluate(fc);
        let dry = idle + mil_span * n2_norm * n2_norm;
        let bled = dry * (1.0 - self.state.bleed_demand);

        let mut gross = bled;
        if augmenting && let Some(max_curve) = &self.curves.max {
            let max_thrust = c.max_thrust_lbf * max_curve.evaluate(fc);
            gross = match c.aug_method {
                AugMethod::ExtendedRange => gross + (max_thrust - gross) * self.state.augment_cmd,
                AugMethod::Property | AugMethod::ThrottleDetent => max_thrust,
            };
        }
        let aug_extra = (gross - bled).max(0.0);

        if injecting && let Some(injection) = &self.curves.injection {
            gross *= injection.evaluate(fc);
        }

        ThrustBreakdown {
            idle,
            dry,
            bled,
            aug_extra,
            gross: gross.max(0.0),
        }
    }

    fn store_breakdown(&mut self, thrust: &ThrustBreakdown) {
        self.state.idle_thrust_lbf = thrust.idle;
        self.state.dry_thrust_lbf = thrust.dry;
        self.state.aug_extra_lbf = thrust.aug_extra;
    }

    /// Resolve whether the afterburner is lit this frame.
    fn update_augmentation(&mut self) -> bool {
        let c = &self.constants;
        let s = &mut self.state;
        if !c.augmented {
            s.augmentation = false;
            return false;
        }
        let lit = match c.aug_method {
            AugMethod::Property => s.augmentation,
            AugMethod::ThrottleDetent => s.throttle_pos > DETENT_THROTTLE && s.n2 > DETENT_N2,
            AugMethod::ExtendedRange => s.augment_cmd > 0.0,
        };
        s.augmentation = lit;
        lit
    }

    fn injection_active(&self) -> bool {
        self.constants.injected && self.state.injection && self.state.injection_timer_s > 0.0
    }

    fn consume_water(&mut self, dt: f64) {
        self.state.injection_timer_s -= dt;
        if self.state.injection_timer_s <= 0.0 {
            self.state.injection_timer_s = 0.0;
            self.state.injection = false;
            self.emit(EngineEvent::InjectionExhausted);
        }
    }

    fn monitor_faults(&mut self, dt: f64) {
        let s = &self.state;
        let inputs = FaultInputs {
            egt_degc: s.egt_degc,
            n2: s.n2,
            running: s.running && s.phase == Phase::Run,
            fuelled: s.fuel_flow_pph > 0.0,
        };
        let onset = self
            .state
            .faults
            .monitor(&self.constants.limits, inputs, dt);
        for fault in onset {
            self.emit(EngineEvent::FaultRaised(fault));
        }
    }

    fn finish(&mut self, gross: f64) -> f64 {
        let net = if self.state.reversed {
            -self.constants.reverser_factor * gross
        } else {
            gross
        };
        self.state.gross_thrust_lbf = gross;
        self.state.thrust_lbf = net;
        net
    }

    fn transition(&mut self, to: Phase) {
        let from = self.state.phase;
        if from != to {
            self.state.phase = to;
            self.emit(EngineEvent::PhaseChanged { from, to });
        }
    }

    fn clear_fault(&mut self, fault: Fault) {
        if self.state.faults.clear(fault) {
            self.emit(EngineEvent::FaultCleared(fault));
        }
    }

    fn emit(&mut self, event: EngineEvent) {
        self.observer.on_event(&event);
    }

    /// Commanded fuel flow (lbm/hr) for the state left by the last frame.
    pub fn calc_fuel_need(&self) -> f64 {
        let c = &self.constants;
        let s = &self.state;
        let demand = FuelDemand {
            cutoff: s.cutoff,
            idle_flow_pph: c.idle_fuel_flow_pph(),
            n2: s.n2,
            idle_n2: c.idle_n2,
            idle_thrust_lbf: s.idle_thrust_lbf,
            dry_thrust_lbf: s.dry_thrust_lbf,
            aug_extra_lbf: s.aug_extra_lbf,
            atsfc: c.atsfc,
        };
        fuel::commanded_flow(s.phase, &demand, s.corrected_tsfc)
    }

    /// Fuel burned over `dt` at the current flow (lbm).
    pub fn fuel_expended_lbs(&self, dt: f64) -> f64 {
        fuel::fuel_mass_lbs(self.state.fuel_flow_pph, dt)
    }

    /// Thrust still available by spooling to the throttle's steady state (lbf).
    pub fn power_available(&self) -> f64 {
        self.state.target_thrust_lbf - self.state.gross_thrust_lbf
    }

    /// Place the engine directly in the run phase at the current throttle.
    ///
    /// # Errors
    /// [`InitError::NoFuel`] if the supply is dry, [`InitError::Faulted`] if
    /// the core is seized or on fire. State is untouched on error.
    pub fn init_running(
        &mut self,
        fuel: &dyn FuelSupply,
        ambient: &Ambient,
    ) -> Result<(), InitError> {
        if self.state.faults.seized {
            return Err(InitError::Faulted(Fault::Seizure));
        }
        if self.state.faults.fire {
            return Err(InitError::Faulted(Fault::Fire));
        }
        if !fuel.has_fuel() {
            return Err(InitError::NoFuel);
        }

        self.state.starved = false;
        self.clear_fault(Fault::Stall);
        self.place_at_throttle(ambient);
        self.transition(Phase::Run);

        let fc = ambient.conditions.with_throttle(self.state.throttle_pos);
        let gross = self.settle(ambient, &fc);
        self.state.target_thrust_lbf = gross;
        self.state.fuel_flow_pph = self.calc_fuel_need();
        self.finish(gross);
        Ok(())
    }

    /// Restore the construction baseline: faults cleared, water refilled,
    /// phase back to trim.
    pub fn reset_to_ic(&mut self) {
        self.state = EngineState::baseline(&self.constants);
        self.emit(EngineEvent::Reset);
    }

    pub fn engine_labels(&self, delimiter: &str) -> String {
        telemetry::labels(&self.constants.name, self.engine_number, delimiter)
    }

    pub fn engine_values(&self, delimiter: &str) -> String {
        telemetry::values(&self.state, delimiter)
    }

    // Control inputs

    /// Throttle in [0, 2]. Above 1.0 is afterburner demand for engines using
    /// the extended throttle range.
    pub fn set_throttle(&mut self, throttle: f64) {
        let t = clamp_input(throttle, 0.0, THROTTLE_MAX);
        let c = &self.constants;
        self.state.augment_cmd = if c.augmented && c.aug_method == AugMethod::ExtendedRange {
            (t - 1.0).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.state.throttle_pos = t.min(1.0);
    }

    pub fn set_starter(&mut self, on: bool) {
        self.state.starter = on;
    }

    pub fn set_cutoff(&mut self, on: bool) {
        self.state.cutoff = on;
    }

    pub fn set_ignition(&mut self, on: bool) {
        self.state.ignition = on;
    }

    pub fn set_running(&mut self, on: bool) {
        self.state.running = on;
    }

    pub fn set_starved(&mut self, on: bool) {
        self.state.starved = on;
    }

    pub fn set_augmentation(&mut self, on: bool) {
        self.state.augmentation = on;
    }

    /// Request water injection. Ignored without an injection system or water.
    pub fn set_injection(&mut self, on: bool) {
        self.state.injection =
            on && self.constants.injected && self.state.injection_timer_s > 0.0;
    }

    pub fn set_reverse(&mut self, on: bool) {
        self.state.reversed = on;
    }

    pub fn set_bleed_demand(&mut self, bleed: f64) {
        self.state.bleed_demand = clamp_input(bleed, 0.0, 1.0);
    }

    pub fn set_epr(&mut self, epr: f64) {
        if epr.is_finite() {
            self.state.epr = epr;
        }
    }

    /// Force a phase. Forcing stall or seize latches the matching fault.
    pub fn set_phase(&mut self, phase: Phase) {
        let fault = match phase {
            Phase::Stall => Some(Fault::Stall),
            Phase::Seize => Some(Fault::Seizure),
            _ => None,
        };
        if let Some(fault) = fault
            && self.state.faults.latch(fault)
        {
            self.emit(EngineEvent::FaultRaised(fault));
        }
        self.transition(phase);
    }

    pub fn set_engine_number(&mut self, engine_number: usize) {
        self.engine_number = engine_number;
    }

    // Accessors

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn constants(&self) -> &EngineConstants {
        &self.constants
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn engine_number(&self) -> usize {
        self.engine_number
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn stalled(&self) -> bool {
        self.state.faults.stalled
    }

    pub fn seized(&self) -> bool {
        self.state.faults.seized
    }

    pub fn overtemp(&self) -> bool {
        self.state.faults.overtemp
    }

    pub fn fire(&self) -> bool {
        self.state.faults.fire
    }

    pub fn injection(&self) -> bool {
        self.state.injection
    }

    pub fn augmentation(&self) -> bool {
        self.state.augmentation
    }

    pub fn reversed(&self) -> bool {
        self.state.reversed
    }

    pub fn cutoff(&self) -> bool {
        self.state.cutoff
    }

    pub fn ignition(&self) -> bool {
        self.state.ignition
    }

    pub fn starter(&self) -> bool {
        self.state.starter
    }

    pub fn running(&self) -> bool {
        self.state.running
    }

    pub fn starved(&self) -> bool {
        self.state.starved
    }

    pub fn throttle(&self) -> f64 {
        self.state.throttle_pos
    }

    pub fn augment_cmd(&self) -> f64 {
        self.state.augment_cmd
    }

    pub fn inlet(&self) -> f64 {
        self.state.inlet.position
    }

    pub fn nozzle(&self) -> f64 {
        self.state.nozzle.position
    }

    pub fn bleed_demand(&self) -> f64 {
        self.state.bleed_demand
    }

    pub fn n1(&self) -> f64 {
        self.state.n1
    }

    pub fn n2(&self) -> f64 {
        self.state.n2
    }

    pub fn n2_norm(&self) -> f64 {
        self.state.n2_norm
    }

    pub fn epr(&self) -> f64 {
        self.state.epr
    }

    pub fn egt_degc(&self) -> f64 {
        self.state.egt_degc
    }

    pub fn oil_pressure_psi(&self) -> f64 {
        self.state.oil_pressure_psi
    }

    pub fn oil_temp_degk(&self) -> f64 {
        self.state.oil_temp_degk
    }

    pub fn oil_temp_degf(&self) -> f64 {
        temp_degf(k(self.state.oil_temp_degk))
    }

    pub fn thrust_lbf(&self) -> f64 {
        self.state.thrust_lbf
    }

    pub fn gross_thrust_lbf(&self) -> f64 {
        self.state.gross_thrust_lbf
    }

    pub fn target_thrust_lbf(&self) -> f64 {
        self.state.target_thrust_lbf
    }

    pub fn fuel_flow_pph(&self) -> f64 {
        self.state.fuel_flow_pph
    }

    pub fn injection_timer_s(&self) -> f64 {
        self.state.injection_timer_s
    }

    pub fn corrected_tsfc(&self) -> f64 {
        self.state.corrected_tsfc
    }
}

/// Windmill toward `target`, spinning up from rest at a minimum rate.
fn windmill(n: f64, target: f64, dt: f64) -> f64 {
    seek(n, target, (n / 2.0).max(WINDMILL_MIN_RATE), n / 2.0, dt).max(0.0)
}

/// Inlet ramps close from fully open at Mach 1 to half open at Mach 2.
fn inlet_command(fc: &FlightConditions) -> f64 {
    1.0 - 0.5 * (fc.mach - 1.0).clamp(0.0, 1.0)
}

/// EPR rises linearly with dry thrust: 1 at zero, 2 at rated military thrust.
fn pressure_ratio(dry_thrust_lbf: f64, mil_thrust_lbf: f64) -> f64 {
    if mil_thrust_lbf > 0.0 {
        1.0 + dry_thrust_lbf.max(0.0) / mil_thrust_lbf
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel::{FuelTank, UnlimitedFuel};
    use crate::observer::EventLog;

    fn constants() -> EngineConstants {
        EngineConstants::new("test", 10_000.0, 0.8, 30.0, 60.0, 100.0, 100.0)
    }

    fn engine() -> Turbine<EventLog> {
        Turbine::with_observer(constants(), ThrustCurves::constant(0.03, 1.0), EventLog::new())
            .unwrap()
    }

    #[test]
    fn starts_in_trim_with_cutoff() {
        let e = engine();
        assert_eq!(e.phase(), Phase::Trim);
        assert!(e.cutoff());
        assert_eq!(e.n2(), 0.0);
        assert_eq!(e.injection_timer_s(), 30.0);
    }

    #[test]
    fn first_tick_without_running_goes_off() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        assert_eq!(e.calculate(&amb, 0.01), 0.0);
        assert_eq!(e.phase(), Phase::Off);
        assert_eq!(e.observer().phases_entered(), vec![Phase::Off]);
    }

    #[test]
    fn first_tick_while_running_goes_to_run_at_throttle() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.set_running(true);
        e.set_throttle(0.5);
        e.calculate(&amb, 0.01);
        assert_eq!(e.phase(), Phase::Run);
        assert!((e.n2() - 80.0).abs() < 1e-9);
        assert!(!e.cutoff());
    }

    #[test]
    fn zero_dt_is_trim() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.init_running(&UnlimitedFuel, &amb).unwrap();
        e.set_throttle(1.0);
        let thrust = e.calculate(&amb, 0.0);
        assert_eq!(e.phase(), Phase::Trim);
        assert!((thrust - 10_000.0).abs() < 1e-6);
        assert!(e.fuel_flow_pph() > 0.0);
    }

    #[test]
    fn throttle_is_clamped() {
        let mut e = engine();
        e.set_throttle(5.0);
        assert_eq!(e.throttle(), 1.0);
        assert_eq!(e.augment_cmd(), 0.0);
        e.set_throttle(-1.0);
        assert_eq!(e.throttle(), 0.0);
        e.set_throttle(f64::NAN);
        assert_eq!(e.throttle(), 0.0);
    }

    #[test]
    fn bleed_demand_clamped_and_defaulted() {
        let mut c = constants();
        c.bleed = 0.05;
        let mut e = Turbine::new(c, ThrustCurves::constant(0.03, 1.0)).unwrap();
        assert_eq!(e.bleed_demand(), 0.05);
        e.set_bleed_demand(3.0);
        assert_eq!(e.bleed_demand(), 1.0);
    }

    #[test]
    fn init_running_settles_thrust() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.set_throttle(1.0);
        e.init_running(&UnlimitedFuel, &amb).unwrap();
        assert_eq!(e.phase(), Phase::Run);
        assert!(e.running());
        assert!((e.n2() - 100.0).abs() < 1e-9);
        assert!((e.thrust_lbf() - 10_000.0).abs() < 1e-6);
        assert!(e.power_available().abs() < 1e-6);
        assert!(e.fuel_flow_pph() > e.constants().idle_fuel_flow_pph());
    }

    #[test]
    fn init_running_without_fuel_leaves_state() {
        let mut e = engine();
        let before = e.state().clone();
        let err = e
            .init_running(&FuelTank::new(0.0), &Ambient::sea_level())
            .unwrap_err();
        assert_eq!(err, InitError::NoFuel);
        assert_eq!(e.state(), &before);
    }

    #[test]
    fn init_running_refuses_seized_core() {
        let mut e = engine();
        e.set_phase(Phase::Seize);
        let err = e
            .init_running(&UnlimitedFuel, &Ambient::sea_level())
            .unwrap_err();
        assert_eq!(err, InitError::Faulted(Fault::Seizure));
    }

    #[test]
    fn power_available_while_spooling() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.init_running(&UnlimitedFuel, &amb).unwrap();
        e.set_throttle(1.0);
        e.calculate(&amb, 0.1);
        let available = e.power_available();
        assert!(available > 0.0);
        assert!((available - (e.target_thrust_lbf() - e.gross_thrust_lbf())).abs() < 1e-12);
        // reading does not mutate
        assert_eq!(e.power_available(), available);
    }

    #[test]
    fn cutoff_shuts_down_and_spools_decay() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.init_running(&UnlimitedFuel, &amb).unwrap();
        e.set_cutoff(true);
        e.calculate(&amb, 0.1);
        assert_eq!(e.phase(), Phase::Off);
        assert!(!e.running());
        assert_eq!(e.fuel_flow_pph(), 0.0);
        let n2 = e.n2();
        e.calculate(&amb, 0.1);
        assert!(e.n2() < n2);
    }

    #[test]
    fn starved_engine_flames_out() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.init_running(&UnlimitedFuel, &amb).unwrap();
        e.set_starved(true);
        e.calculate(&amb, 0.1);
        assert_eq!(e.phase(), Phase::Off);
        assert_eq!(e.fuel_flow_pph(), 0.0);
    }

    #[test]
    fn releasing_starter_during_spin_up_aborts() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.set_starter(true);
        e.calculate(&amb, 0.1);
        assert_eq!(e.phase(), Phase::SpinUp);
        e.set_starter(false);
        e.calculate(&amb, 0.1);
        assert_eq!(e.phase(), Phase::Off);
    }

    #[test]
    fn starter_disengages_at_light_off() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.set_starter(true);
        for _ in 0..600 {
            e.calculate(&amb, 0.1);
            if e.n2() >= LIGHT_OFF_N2 {
                break;
            }
        }
        assert_eq!(e.phase(), Phase::SpinUp);
        assert!(e.starter());

        e.set_cutoff(false);
        e.calculate(&amb, 0.1);
        assert_eq!(e.phase(), Phase::Start);
        assert!(!e.starter());

        for _ in 0..600 {
            e.calculate(&amb, 0.1);
        }
        assert_eq!(e.phase(), Phase::Run);
    }

    #[test]
    fn windmilling_air_start() {
        let mut e = engine();
        let amb = Ambient {
            qbar_psf: 300.0,
            ..Ambient::sea_level()
        };
        e.calculate(&amb, 0.1);
        e.set_cutoff(false);
        for _ in 0..600 {
            e.calculate(&amb, 0.1);
            if e.phase() == Phase::Start {
                break;
            }
        }
        // cutoff cleared with no starter: ram air alone reaches light-off
        assert_eq!(e.phase(), Phase::Start);
    }

    #[test]
    fn reverser_negates_scaled_thrust() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.set_throttle(1.0);
        e.init_running(&UnlimitedFuel, &amb).unwrap();
        e.set_reverse(true);
        let net = e.calculate(&amb, 0.01);
        assert!(net < 0.0);
        assert!((net + 0.5 * e.gross_thrust_lbf()).abs() < 1e-9);
    }

    #[test]
    fn forced_stall_latches_and_idle_throttle_recovers() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.set_throttle(0.8);
        e.init_running(&UnlimitedFuel, &amb).unwrap();
        e.set_phase(Phase::Stall);
        assert!(e.stalled());

        for _ in 0..10 {
            let thrust = e.calculate(&amb, 0.05);
            assert_eq!(e.phase(), Phase::Stall);
            assert!(thrust >= 0.0);
            assert!(thrust < e.target_thrust_lbf());
            assert_eq!(e.fuel_flow_pph(), e.constants().idle_fuel_flow_pph());
        }
        assert!(e.egt_degc() > 900.0);

        e.set_throttle(0.0);
        e.calculate(&amb, 0.05);
        assert!(!e.stalled());
        assert_eq!(e.phase(), Phase::Run);
        assert!(
            e.observer()
                .events()
                .contains(&EngineEvent::FaultCleared(Fault::Stall))
        );
    }

    #[test]
    fn stall_recovery_does_not_relatch() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        let dt = 1.0 / 120.0;
        e.set_throttle(1.0);
        e.init_running(&UnlimitedFuel, &amb).unwrap();
        e.set_phase(Phase::Stall);
        // hold well past the stall delay
        for _ in 0..600 {
            e.calculate(&amb, dt);
        }
        assert!(e.egt_degc() > e.constants().limits.egt_limit_degc);

        e.set_throttle(0.0);
        for frame in 0..600 {
            e.calculate(&amb, dt);
            assert!(!e.stalled(), "stalled again at frame {frame}");
            assert_eq!(e.phase(), Phase::Run);
        }
        let stalls = e
            .observer()
            .faults_raised()
            .into_iter()
            .filter(|f| *f == Fault::Stall)
            .count();
        assert_eq!(stalls, 1);
    }

    #[test]
    fn epr_scales_with_rated_thrust() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.set_throttle(1.0);
        e.init_running(&UnlimitedFuel, &amb).unwrap();
        e.calculate(&amb, 0.0);
        assert!((e.thrust_lbf() - 10_000.0).abs() < 1e-6);
        assert!((e.epr() - 2.0).abs() < 1e-9);

        e.set_throttle(0.5);
        e.calculate(&amb, 0.0);
        let expected = 1.0 + e.thrust_lbf() / e.constants().mil_thrust_lbf;
        assert!((e.epr() - expected).abs() < 1e-9);
    }

    #[test]
    fn seize_is_absorbing() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.init_running(&UnlimitedFuel, &amb).unwrap();
        e.set_phase(Phase::Seize);
        e.set_starter(true);
        e.set_cutoff(false);
        e.set_throttle(1.0);
        for dt in [0.1, 0.0, 0.1] {
            assert_eq!(e.calculate(&amb, dt), 0.0);
            assert_eq!(e.phase(), Phase::Seize);
            assert_eq!(e.n2(), 0.0);
            assert_eq!(e.oil_pressure_psi(), 0.0);
            assert_eq!(e.fuel_flow_pph(), 0.0);
        }
        e.reset_to_ic();
        assert!(!e.seized());
        assert_eq!(e.phase(), Phase::Trim);
    }

    #[test]
    fn oil_temp_in_fahrenheit() {
        let e = engine();
        // 288 K
        assert!((e.oil_temp_degf() - 58.73).abs() < 0.01);
    }

    #[test]
    fn fuel_expended_over_frame() {
        let mut e = engine();
        let amb = Ambient::sea_level();
        e.init_running(&UnlimitedFuel, &amb).unwrap();
        let expected = e.fuel_flow_pph() / 3600.0 * 0.5;
        assert!((e.fuel_expended_lbs(0.5) - expected).abs() < 1e-12);
    }
}
