//! Two-wire pressure transducer (4–20 mA).

use crate::error::DeviceResult;
use crate::traits::{ElectricalNode, PneumaticNode};
use rig_core::ensure_finite;
use rig_core::units::{Current, Pressure, bar, in_bar, in_milliamps, milliamps};

/// Loop current at zero pressure.
pub const LIVE_ZERO_MA: f64 = 4.0;
/// Loop current added at full span.
pub const SPAN_MA: f64 = 16.0;

/// Pressure-to-current transducer.
///
/// The pneumatic port `i` feeds the reading; the wire terminals `p` (toward
/// the supply's positive side) and `n` (return) carry the loop current.
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    /// Pressure mapped to 20 mA
    pub span: Pressure,
    /// Internal break: the loop through the sensor is open
    pub internal_open: bool,
    /// Last pressure seen at the port
    pub pressure: Pressure,
}

impl Sensor {
    pub fn new(span: Pressure) -> DeviceResult<Self> {
        let span_bar = ensure_finite(in_bar(span), "sensor span")?;
        if span_bar <= 0.0 {
            return Err(crate::error::DeviceError::InvalidArg {
                what: "sensor span must be positive",
            });
        }
        Ok(Self {
            span,
            internal_open: false,
            pressure: bar(0.0),
        })
    }

    /// Operating current for the last pressure reading.
    pub fn output_current(&self) -> Current {
        let frac = (in_bar(self.pressure) / in_bar(self.span)).clamp(0.0, 1.0);
        milliamps(LIVE_ZERO_MA + SPAN_MA * frac)
    }

    pub fn readout(&self, powered: bool) -> String {
        if powered {
            format!("{:.2} mA", in_milliamps(self.output_current()))
        } else {
            "-- mA".to_string()
        }
    }
}

impl ElectricalNode for Sensor {
    fn wire_roles(&self) -> &'static [&'static str] {
        &["p", "n"]
    }
}

impl PneumaticNode for Sensor {
    fn pipe_roles(&self) -> &'static [&'static str] {
        &["i"]
    }
}
