//! DC supply with on/off switch.

use crate::error::{DeviceError, DeviceResult};
use crate::traits::ElectricalNode;
use rig_core::ensure_non_negative;
use rig_core::units::{Potential, in_volts, volts};

/// Highest output an adjustable supply accepts.
pub const MAX_OUTPUT_V: f64 = 30.0;

/// Fixed or adjustable DC supply.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    /// Nominal output while on
    pub nominal: Potential,
    /// Whether `set_output` is accepted
    pub adjustable: bool,
    /// Output switch
    pub on: bool,
}

impl Source {
    /// Fixed supply, initially off.
    pub fn fixed(nominal: Potential) -> Self {
        Self {
            nominal,
            adjustable: false,
            on: false,
        }
    }

    /// Adjustable supply, initially off.
    pub fn adjustable(nominal: Potential) -> Self {
        Self {
            adjustable: true,
            ..Self::fixed(nominal)
        }
    }

    /// Set the nominal output (clamped to `0..=MAX_OUTPUT_V`).
    pub fn set_output(&mut self, v: f64) -> DeviceResult<()> {
        if !self.adjustable {
            return Err(DeviceError::NotAdjustable {
                device: "fixed supply".into(),
            });
        }
        let v = ensure_non_negative(v, "supply output")?;
        self.nominal = volts(v.min(MAX_OUTPUT_V));
        Ok(())
    }

    /// Potential actually present on the positive terminal.
    pub fn output(&self) -> Potential {
        if self.on { self.nominal } else { volts(0.0) }
    }

    pub fn readout(&self) -> String {
        if self.on {
            format!("{:.1} V", in_volts(self.nominal))
        } else {
            "OFF".to_string()
        }
    }
}

impl ElectricalNode for Source {
    fn wire_roles(&self) -> &'static [&'static str] {
        &["p", "n"]
    }
}
