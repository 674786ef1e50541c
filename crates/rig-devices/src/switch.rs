//! Two-terminal switch.

use crate::traits::ElectricalNode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Switch {
    pub closed: bool,
}

impl Switch {
    pub fn new(closed: bool) -> Self {
        Self { closed }
    }

    pub fn readout(&self) -> String {
        let label = if self.closed { "CLOSED" } else { "OPEN" };
        label.to_string()
    }
}

impl ElectricalNode for Switch {
    fn wire_roles(&self) -> &'static [&'static str] {
        &["a", "b"]
    }

    fn bridges(&self) -> bool {
        self.closed
    }
}
