//! Three-port splitter.

use crate::traits::{PneumaticNode, PortOutputs};
use rig_core::units::Pressure;

const PORTS: [&str; 3] = ["a", "b", "c"];

/// Stateless tee: pressure arriving at one port leaves the other two unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tee;

impl PneumaticNode for Tee {
    fn pipe_roles(&self) -> &'static [&'static str] {
        &PORTS
    }

    fn transform(&self, role: &str, pressure: Pressure) -> PortOutputs {
        if !PORTS.contains(&role) {
            return Vec::new();
        }
        PORTS
            .iter()
            .filter(|&&p| p != role)
            .map(|&p| (p, pressure))
            .collect()
    }
}
