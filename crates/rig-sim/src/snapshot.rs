//! Serializable projection of the rig for undo and save points.

use rig_core::units::{in_bar, in_ohms, in_volts};
use rig_devices::{DeviceKind, MeterMode};
use rig_graph::{ConnectionGraph, ConnectionRecord};
use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::state::SimulationState;

/// User-settable state of one device. Derived readings are not stored; the
/// next cycle recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<MeterMode>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub connections: Vec<ConnectionRecord>,
    pub devices: Vec<DeviceState>,
}

impl Snapshot {
    pub fn capture(state: &SimulationState) -> Self {
        let devices = state
            .devices
            .iter()
            .map(|dev| {
                let mut ds = DeviceState {
                    id: dev.id.clone(),
                    value: None,
                    on: None,
                    mode: None,
                };
                match &dev.kind {
                    DeviceKind::Source(src) => {
                        ds.on = Some(src.on);
                        if src.adjustable {
                            ds.value = Some(in_volts(src.nominal));
                        }
                    }
                    DeviceKind::Multimeter(m) => ds.mode = Some(m.mode),
                    DeviceKind::Load(l) => ds.value = Some(in_ohms(l.resistance)),
                    DeviceKind::Switch(sw) => ds.value = Some(f64::from(u8::from(sw.closed))),
                    DeviceKind::Valve(v) => ds.value = Some(f64::from(u8::from(v.open))),
                    DeviceKind::Regulator(r) => ds.value = Some(in_bar(r.setpoint)),
                    DeviceKind::Reservoir(r) => ds.value = Some(in_bar(r.pressure)),
                    _ => {}
                }
                ds
            })
            .collect();
        Self {
            connections: state.connections.records(),
            devices,
        }
    }

    /// Apply to `state`. Either everything applies or `state` is untouched.
    pub fn restore(&self, state: &mut SimulationState) -> SimResult<()> {
        let mut next = state.clone();
        let mut graph = ConnectionGraph::new();
        for rec in &self.connections {
            graph.add_connection(&next.registry, &rec.from, &rec.to, rec.kind)?;
        }
        next.connections = graph;

        for ds in &self.devices {
            let dev = next.device_mut(&ds.id)?;
            match (&mut dev.kind, ds.on, ds.mode) {
                (DeviceKind::Source(src), Some(on), _) => src.on = on,
                (DeviceKind::Multimeter(m), _, Some(mode)) => m.set_mode(mode),
                _ => {}
            }
            if let Some(v) = ds.value {
                dev.set_value(v)?;
            }
            dev.update();
        }
        *state = next;
        Ok(())
    }
}
