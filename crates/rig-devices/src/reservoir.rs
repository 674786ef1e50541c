//! Compressed-air reservoir.

use crate::error::DeviceResult;
use crate::traits::PneumaticNode;
use rig_core::ensure_non_negative;
use rig_core::units::{Pressure, Time, bar, in_bar, in_seconds};

/// Pressure source at port `o`. Depletes while consuming.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservoir {
    pub pressure: Pressure,
    /// Charge pressure restored by `refill`
    pub charge: Pressure,
    /// Loss rate while consuming (bar per second)
    pub depletion_rate: f64,
    /// Set by the update cycle when air escapes downstream
    pub consuming: bool,
}

impl Reservoir {
    pub fn new(charge: Pressure, depletion_rate: f64) -> DeviceResult<Self> {
        ensure_non_negative(in_bar(charge), "reservoir charge")?;
        let depletion_rate = ensure_non_negative(depletion_rate, "depletion rate")?;
        Ok(Self {
            pressure: charge,
            charge,
            depletion_rate,
            consuming: false,
        })
    }

    /// Lose pressure over `dt` if consuming. Never drops below zero.
    pub fn deplete(&mut self, dt: Time) {
        if !self.consuming {
            return;
        }
        let dt = in_seconds(dt).max(0.0);
        let next = in_bar(self.pressure) - self.depletion_rate * dt;
        self.pressure = bar(next.max(0.0));
    }

    pub fn refill(&mut self) {
        self.pressure = self.charge;
    }

    pub fn set_pressure(&mut self, p_bar: f64) -> DeviceResult<()> {
        let p = ensure_non_negative(p_bar, "reservoir pressure")?;
        self.pressure = bar(p);
        Ok(())
    }

    pub fn readout(&self) -> String {
        format!("{:.1} bar", in_bar(self.pressure))
    }
}

impl PneumaticNode for Reservoir {
    fn pipe_roles(&self) -> &'static [&'static str] {
        &["o"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_core::units::s;

    #[test]
    fn depletes_only_while_consuming() {
        let mut r = Reservoir::new(bar(50.0), 2.0).unwrap();
        r.deplete(s(1.0));
        assert_eq!(in_bar(r.pressure), 50.0);
        r.consuming = true;
        r.deplete(s(1.5));
        assert!((in_bar(r.pressure) - 47.0).abs() < 1e-9);
    }

    #[test]
    fn never_goes_negative() {
        let mut r = Reservoir::new(bar(1.0), 5.0).unwrap();
        r.consuming = true;
        r.deplete(s(10.0));
        assert_eq!(in_bar(r.pressure), 0.0);
        r.refill();
        assert_eq!(in_bar(r.pressure), 1.0);
    }
}
