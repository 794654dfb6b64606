// gt-core/src/units.rs

use uom::si::f64::{Force as UomForce, ThermodynamicTemperature as UomThermodynamicTemperature};

// Public canonical unit types (SI, f64)
pub type Force = UomForce;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn lbf(v: f64) -> Force {
    use uom::si::force::pound_force;
    Force::new::<pound_force>(v)
}

#[inline]
pub fn newtons(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

/// Thrust in pounds-force, the engine's internal force unit.
#[inline]
pub fn force_lbf(f: Force) -> f64 {
    use uom::si::force::pound_force;
    f.get::<pound_force>()
}

#[inline]
pub fn temp_k(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

#[inline]
pub fn temp_degf(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_fahrenheit;
    t.get::<degree_fahrenheit>()
}

#[inline]
pub fn temp_rankine(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_rankine;
    t.get::<degree_rankine>()
}

pub mod constants {
    /// Sea-level standard temperature (°C).
    pub const ISA_SL_DEGC: f64 = 15.0;
    /// Seconds per hour, for lbm/hr fuel flow bookkeeping.
    pub const SECONDS_PER_HOUR: f64 = 3600.0;
}
