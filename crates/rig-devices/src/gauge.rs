//! Dial pressure gauge.

use crate::traits::PneumaticNode;
use rig_core::units::{Pressure, bar, in_bar};

#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub reading: Pressure,
}

impl Gauge {
    pub fn new() -> Self {
        Self { reading: bar(0.0) }
    }

    pub fn readout(&self) -> String {
        format!("{:.2} bar", in_bar(self.reading))
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new()
    }
}

impl PneumaticNode for Gauge {
    fn pipe_roles(&self) -> &'static [&'static str] {
        &["i"]
    }
}
