//! Binary pass-through gate.

use crate::traits::{PneumaticNode, PortOutputs};
use rig_core::units::Pressure;

/// Two-port valve: open passes pressure unchanged in either direction,
/// closed passes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Valve {
    pub open: bool,
}

impl Valve {
    pub fn new(open: bool) -> Self {
        Self { open }
    }

    pub fn readout(&self) -> String {
        let label = if self.open { "OPEN" } else { "SHUT" };
        label.to_string()
    }
}

impl PneumaticNode for Valve {
    fn pipe_roles(&self) -> &'static [&'static str] {
        &["i", "o"]
    }

    fn transform(&self, role: &str, pressure: Pressure) -> PortOutputs {
        if !self.open {
            return Vec::new();
        }
        match role {
            "i" => vec![("o", pressure)],
            "o" => vec![("i", pressure)],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_core::units::{bar, in_bar};

    #[test]
    fn closed_valve_drops_pressure() {
        let v = Valve::new(false);
        assert!(v.transform("i", bar(6.0)).is_empty());
    }

    #[test]
    fn open_valve_forwards_both_ways() {
        let v = Valve::new(true);
        let fwd = v.transform("i", bar(6.0));
        assert_eq!(fwd[0].0, "o");
        assert_eq!(in_bar(fwd[0].1), 6.0);
        let back = v.transform("o", bar(2.0));
        assert_eq!(back[0].0, "i");
    }
}
