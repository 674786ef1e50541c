//! The closed device variant and the device contract used by the update cycle.

use rig_graph::{GraphResult, RegistryBuilder, TerminalKind, TerminalRegistry};

use crate::error::{DeviceError, DeviceResult};
use crate::traits::{ElectricalNode, PneumaticNode};
use crate::{
    Ammeter, Gauge, Load, Multimeter, Regulator, Reservoir, Sensor, Source, Switch, Tee, Valve,
};
use rig_core::units::{in_bar, in_milliamps, in_ohms, in_volts};

/// Every device role the rig knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceKind {
    Source(Source),
    Sensor(Sensor),
    Ammeter(Ammeter),
    Multimeter(Multimeter),
    Load(Load),
    Switch(Switch),
    Valve(Valve),
    Regulator(Regulator),
    Tee(Tee),
    Reservoir(Reservoir),
    Gauge(Gauge),
}

impl DeviceKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            DeviceKind::Source(_) => "source",
            DeviceKind::Sensor(_) => "sensor",
            DeviceKind::Ammeter(_) => "ammeter",
            DeviceKind::Multimeter(_) => "multimeter",
            DeviceKind::Load(_) => "load",
            DeviceKind::Switch(_) => "switch",
            DeviceKind::Valve(_) => "valve",
            DeviceKind::Regulator(_) => "regulator",
            DeviceKind::Tee(_) => "tee",
            DeviceKind::Reservoir(_) => "reservoir",
            DeviceKind::Gauge(_) => "gauge",
        }
    }

    /// Electrical capability, if the role has wire terminals.
    pub fn electrical(&self) -> Option<&dyn ElectricalNode> {
        match self {
            DeviceKind::Source(d) => Some(d),
            DeviceKind::Sensor(d) => Some(d),
            DeviceKind::Ammeter(d) => Some(d),
            DeviceKind::Multimeter(d) => Some(d),
            DeviceKind::Load(d) => Some(d),
            DeviceKind::Switch(d) => Some(d),
            _ => None,
        }
    }

    /// Pneumatic capability, if the role has pipe ports.
    pub fn pneumatic(&self) -> Option<&dyn PneumaticNode> {
        match self {
            DeviceKind::Sensor(d) => Some(d),
            DeviceKind::Valve(d) => Some(d),
            DeviceKind::Regulator(d) => Some(d),
            DeviceKind::Tee(d) => Some(d),
            DeviceKind::Reservoir(d) => Some(d),
            DeviceKind::Gauge(d) => Some(d),
            _ => None,
        }
    }

    /// Terminals this role exposes, wire terminals first.
    pub fn terminal_specs(&self) -> Vec<(TerminalKind, &'static str)> {
        let mut specs = Vec::new();
        if let Some(e) = self.electrical() {
            specs.extend(e.wire_roles().iter().map(|&r| (TerminalKind::Electrical, r)));
        }
        if let Some(p) = self.pneumatic() {
            specs.extend(p.pipe_roles().iter().map(|&r| (TerminalKind::Pneumatic, r)));
        }
        specs
    }
}

/// A device instance on the rig.
///
/// Devices are created once and never destroyed; `reset` restores the state
/// they were created with.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: String,
    pub kind: DeviceKind,
    initial: DeviceKind,
    powered: bool,
    display: String,
}

impl Device {
    pub fn new(id: impl Into<String>, kind: DeviceKind) -> Self {
        let mut dev = Self {
            id: id.into(),
            initial: kind.clone(),
            kind,
            powered: false,
            display: String::new(),
        };
        dev.update();
        dev
    }

    /// Primary value of the device, in its display unit.
    pub fn value(&self) -> f64 {
        match &self.kind {
            DeviceKind::Source(d) => in_volts(d.nominal),
            DeviceKind::Sensor(d) => in_milliamps(d.output_current()),
            DeviceKind::Ammeter(d) => in_milliamps(d.reading),
            DeviceKind::Multimeter(d) => d.reading,
            DeviceKind::Load(d) => in_ohms(d.resistance),
            DeviceKind::Switch(d) => f64::from(u8::from(d.closed)),
            DeviceKind::Valve(d) => f64::from(u8::from(d.open)),
            DeviceKind::Regulator(d) => in_bar(d.last_output),
            DeviceKind::Tee(_) => 0.0,
            DeviceKind::Reservoir(d) => in_bar(d.pressure),
            DeviceKind::Gauge(d) => in_bar(d.reading),
        }
    }

    /// Set the user-adjustable quantity of the device.
    ///
    /// Supply output (V), load resistance (ohm), regulator setpoint (bar),
    /// reservoir pressure (bar); switches and valves take non-zero as
    /// closed/open. Read-only devices refuse with `NotAdjustable`.
    pub fn set_value(&mut self, v: f64) -> DeviceResult<()> {
        match &mut self.kind {
            DeviceKind::Source(d) if !d.adjustable => {
                return Err(DeviceError::NotAdjustable {
                    device: self.id.clone(),
                });
            }
            DeviceKind::Source(d) => d.set_output(v)?,
            DeviceKind::Load(d) => d.set_resistance(v)?,
            DeviceKind::Switch(d) => d.closed = v != 0.0,
            DeviceKind::Valve(d) => d.open = v != 0.0,
            DeviceKind::Regulator(d) => d.set_setpoint(v)?,
            DeviceKind::Reservoir(d) => d.set_pressure(v)?,
            _ => {
                return Err(DeviceError::NotAdjustable {
                    device: self.id.clone(),
                });
            }
        }
        self.update();
        Ok(())
    }

    /// Whether the device currently carries live current or pressure.
    pub fn set_power(&mut self, on: bool) {
        self.powered = on;
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Refresh the display text from the current inputs.
    pub fn update(&mut self) {
        self.display = match &self.kind {
            DeviceKind::Source(d) => d.readout(),
            DeviceKind::Sensor(d) => d.readout(self.powered),
            DeviceKind::Ammeter(d) => d.readout(),
            DeviceKind::Multimeter(d) => d.readout(),
            DeviceKind::Load(d) => d.readout(),
            DeviceKind::Switch(d) => d.readout(),
            DeviceKind::Valve(d) => d.readout(),
            DeviceKind::Regulator(d) => d.readout(),
            DeviceKind::Tee(_) => String::new(),
            DeviceKind::Reservoir(d) => d.readout(),
            DeviceKind::Gauge(d) => d.readout(),
        };
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Restore the state the device was created with.
    pub fn reset(&mut self) {
        self.kind = self.initial.clone();
        self.powered = false;
        self.update();
    }
}

/// Register every device's terminals. Device indices follow slice order.
pub fn build_registry(devices: &[Device]) -> GraphResult<TerminalRegistry> {
    let mut builder = RegistryBuilder::new();
    for dev in devices {
        let idx = builder.add_device(dev.id.as_str())?;
        for (kind, role) in dev.kind.terminal_specs() {
            builder.add_terminal(idx, kind, role)?;
        }
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_core::units::{bar, ohms, volts};

    #[test]
    fn sensor_has_both_capabilities() {
        let kind = DeviceKind::Sensor(Sensor::new(bar(10.0)).unwrap());
        assert!(kind.electrical().is_some());
        assert!(kind.pneumatic().is_some());
        let specs = kind.terminal_specs();
        assert_eq!(
            specs,
            vec![
                (TerminalKind::Electrical, "p"),
                (TerminalKind::Electrical, "n"),
                (TerminalKind::Pneumatic, "i"),
            ]
        );
    }

    #[test]
    fn registry_follows_id_convention() {
        let devices = vec![
            Device::new("dcP", DeviceKind::Source(Source::fixed(volts(24.0)))),
            Device::new("caB", DeviceKind::Reservoir(Reservoir::new(bar(50.0), 0.5).unwrap())),
            Device::new("muM", DeviceKind::Multimeter(Multimeter::new(Default::default()))),
        ];
        let reg = build_registry(&devices).unwrap();
        for id in ["dcP_wire_p", "dcP_wire_n", "caB_pipe_o", "muM_wire_v", "muM_wire_com"] {
            assert!(reg.lookup(id).is_some(), "{id} missing");
        }
        assert_eq!(reg.len(), 5);
    }

    #[test]
    fn set_value_routes_to_adjustable_quantity() {
        let mut load = Device::new("rsL", DeviceKind::Load(Load::new(ohms(250.0))));
        load.set_value(470.0).unwrap();
        assert_eq!(load.value(), 470.0);
        assert!(load.display().contains("470"));

        let mut gauge = Device::new("gaG", DeviceKind::Gauge(Gauge::new()));
        assert_eq!(
            gauge.set_value(3.0),
            Err(DeviceError::NotAdjustable {
                device: "gaG".into()
            })
        );
    }

    #[test]
    fn fixed_source_error_names_the_device() {
        let mut src = Device::new("dcP", DeviceKind::Source(Source::fixed(volts(24.0))));
        assert_eq!(
            src.set_value(12.0),
            Err(DeviceError::NotAdjustable {
                device: "dcP".into()
            })
        );
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut valve = Device::new("vaV", DeviceKind::Valve(Valve::new(false)));
        valve.set_value(1.0).unwrap();
        valve.set_power(true);
        assert_eq!(valve.value(), 1.0);
        valve.reset();
        assert_eq!(valve.value(), 0.0);
        assert!(!valve.is_powered());
    }
}
