//! Adjustable series resistor.

use crate::error::DeviceResult;
use crate::traits::ElectricalNode;
use rig_core::ensure_non_negative;
use rig_core::units::{Resistance, in_ohms, ohms};

#[derive(Debug, Clone, PartialEq)]
pub struct Load {
    pub resistance: Resistance,
    /// Lower/upper limit of the adjustment knob (ohms)
    pub range: (f64, f64),
    /// Internal break: no current passes through the element
    pub internal_open: bool,
}

impl Load {
    pub fn new(resistance: Resistance) -> Self {
        Self {
            resistance,
            range: (0.0, 10_000.0),
            internal_open: false,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = (min.min(max), max.max(min));
        self.resistance = ohms(in_ohms(self.resistance).clamp(self.range.0, self.range.1));
        self
    }

    /// Turn the knob; the value is clamped to `range`.
    pub fn set_resistance(&mut self, r: f64) -> DeviceResult<()> {
        let r = ensure_non_negative(r, "load resistance")?;
        self.resistance = ohms(r.clamp(self.range.0, self.range.1));
        Ok(())
    }

    pub fn readout(&self) -> String {
        format!("{:.0} Ohm", in_ohms(self.resistance))
    }
}

impl ElectricalNode for Load {
    fn wire_roles(&self) -> &'static [&'static str] {
        &["a", "b"]
    }
}
