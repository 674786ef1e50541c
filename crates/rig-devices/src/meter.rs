//! Ammeter and multimeter.

use crate::traits::ElectricalNode;
use rig_core::units::{Current, in_milliamps, milliamps};
use serde::{Deserialize, Serialize};

/// Panel ammeter. Always bridges its terminals.
#[derive(Debug, Clone, PartialEq)]
pub struct Ammeter {
    pub reading: Current,
}

impl Ammeter {
    pub fn new() -> Self {
        Self {
            reading: milliamps(0.0),
        }
    }

    pub fn readout(&self) -> String {
        format!("{:.2} mA", in_milliamps(self.reading))
    }
}

impl Default for Ammeter {
    fn default() -> Self {
        Self::new()
    }
}

impl ElectricalNode for Ammeter {
    fn wire_roles(&self) -> &'static [&'static str] {
        &["p", "n"]
    }

    fn bridges(&self) -> bool {
        true
    }
}

/// Multimeter function selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeterMode {
    #[default]
    Voltage,
    Resistance,
    Continuity,
    Current,
}

impl MeterMode {
    pub fn unit(self) -> &'static str {
        match self {
            MeterMode::Voltage => "V",
            MeterMode::Resistance => "Ohm",
            MeterMode::Continuity => "",
            MeterMode::Current => "mA",
        }
    }
}

/// Handheld multimeter with probes `v` and `com`.
///
/// `reading` is in the unit of the selected mode: volts, ohms (infinite when
/// open), 1/0 for continuity, milliamps for current.
#[derive(Debug, Clone, PartialEq)]
pub struct Multimeter {
    pub mode: MeterMode,
    pub reading: f64,
}

impl Multimeter {
    pub fn new(mode: MeterMode) -> Self {
        Self { mode, reading: 0.0 }
    }

    /// Switching range clears the display.
    pub fn set_mode(&mut self, mode: MeterMode) {
        if self.mode != mode {
            self.mode = mode;
            self.reading = 0.0;
        }
    }

    pub fn readout(&self) -> String {
        match self.mode {
            MeterMode::Resistance if !self.reading.is_finite() => "OL".to_string(),
            MeterMode::Continuity if self.reading > 0.0 => "BEEP".to_string(),
            MeterMode::Continuity => "----".to_string(),
            mode => format!("{:.2} {}", self.reading, mode.unit()),
        }
    }
}

impl ElectricalNode for Multimeter {
    fn wire_roles(&self) -> &'static [&'static str] {
        &["v", "com"]
    }

    fn bridges(&self) -> bool {
        self.mode == MeterMode::Current
    }
}
