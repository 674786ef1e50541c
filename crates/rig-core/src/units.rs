// rig-core/src/units.rs

use uom::si::f64::{
    ElectricCurrent as UomElectricCurrent, ElectricPotential as UomElectricPotential,
    ElectricalResistance as UomElectricalResistance, Pressure as UomPressure, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Current = UomElectricCurrent;
pub type Potential = UomElectricPotential;
pub type Resistance = UomElectricalResistance;
pub type Pressure = UomPressure;
pub type Time = UomTime;

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn volts(v: f64) -> Potential {
    use uom::si::electric_potential::volt;
    Potential::new::<volt>(v)
}

#[inline]
pub fn amps(v: f64) -> Current {
    use uom::si::electric_current::ampere;
    Current::new::<ampere>(v)
}

#[inline]
pub fn milliamps(v: f64) -> Current {
    use uom::si::electric_current::milliampere;
    Current::new::<milliampere>(v)
}

#[inline]
pub fn ohms(v: f64) -> Resistance {
    use uom::si::electrical_resistance::ohm;
    Resistance::new::<ohm>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn in_bar(p: Pressure) -> f64 {
    use uom::si::pressure::bar;
    p.get::<bar>()
}

#[inline]
pub fn in_volts(v: Potential) -> f64 {
    use uom::si::electric_potential::volt;
    v.get::<volt>()
}

#[inline]
pub fn in_amps(i: Current) -> f64 {
    use uom::si::electric_current::ampere;
    i.get::<ampere>()
}

#[inline]
pub fn in_milliamps(i: Current) -> f64 {
    use uom::si::electric_current::milliampere;
    i.get::<milliampere>()
}

#[inline]
pub fn in_ohms(r: Resistance) -> f64 {
    use uom::si::electrical_resistance::ohm;
    r.get::<ohm>()
}

#[inline]
pub fn in_seconds(t: Time) -> f64 {
    use uom::si::time::second;
    t.get::<second>()
}

/// Ohm's law over canonical units: V = I * R.
#[inline]
pub fn ohmic_drop(i: Current, r: Resistance) -> Potential {
    volts(in_amps(i) * in_ohms(r))
}
