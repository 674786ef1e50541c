//! Capability traits for device roles.

use rig_core::units::Pressure;

/// Pressures leaving a device: `(port role, pressure)` pairs.
pub type PortOutputs = Vec<(&'static str, Pressure)>;

/// A device with wire terminals.
pub trait ElectricalNode {
    /// Wire terminal roles, in registration order.
    fn wire_roles(&self) -> &'static [&'static str];

    /// Whether the device currently joins its two wire terminals with
    /// negligible resistance (closed switch, ammeter, meter on current range).
    ///
    /// Default: never bridges.
    fn bridges(&self) -> bool {
        false
    }
}

/// A device with pipe ports.
pub trait PneumaticNode {
    /// Pipe port roles, in registration order.
    fn pipe_roles(&self) -> &'static [&'static str];

    /// Pressures leaving the device when `pressure` arrives at port `role`.
    ///
    /// Terminal devices (gauges, transducers) return nothing: they record
    /// the reading and never re-propagate. The default is terminal behaviour.
    fn transform(&self, _role: &str, _pressure: Pressure) -> PortOutputs {
        Vec::new()
    }
}
