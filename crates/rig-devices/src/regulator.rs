//! Pressure regulator.

use crate::error::DeviceResult;
use crate::traits::{PneumaticNode, PortOutputs};
use rig_core::ensure_non_negative;
use rig_core::units::{Pressure, bar, in_bar};

/// Pass-through clamped to a setpoint. Flow runs inlet `i` to outlet `o`
/// only; pressure arriving at the outlet is not fed back upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Regulator {
    pub setpoint: Pressure,
    /// Outlet pressure of the last pass, read by the panel
    pub last_output: Pressure,
}

impl Regulator {
    pub fn new(setpoint: Pressure) -> Self {
        Self {
            setpoint,
            last_output: bar(0.0),
        }
    }

    pub fn set_setpoint(&mut self, p_bar: f64) -> DeviceResult<()> {
        let p = ensure_non_negative(p_bar, "regulator setpoint")?;
        self.setpoint = bar(p);
        Ok(())
    }

    /// `min(input, setpoint)`
    pub fn regulate(&self, input: Pressure) -> Pressure {
        if input < self.setpoint {
            input
        } else {
            self.setpoint
        }
    }

    pub fn readout(&self) -> String {
        format!(
            "{:.2} bar (set {:.2})",
            in_bar(self.last_output),
            in_bar(self.setpoint)
        )
    }
}

impl PneumaticNode for Regulator {
    fn pipe_roles(&self) -> &'static [&'static str] {
        &["i", "o"]
    }

    fn transform(&self, role: &str, pressure: Pressure) -> PortOutputs {
        match role {
            "i" => vec![("o", self.regulate(pressure))],
            _ => Vec::new(),
        }
    }
}
