//! The rig's mutable world: registry, devices and connections.

use rig_core::{DeviceIdx, TerminalIdx};
use rig_devices::{Device, build_registry};
use rig_graph::{ConnectionGraph, TerminalRegistry};
use rig_solver::Network;

use crate::error::{SimError, SimResult};

/// Owned by the orchestrator and lent to each solver pass.
///
/// Devices are fixed at construction; only their state, the fault flags and
/// the connection set change afterwards.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub registry: TerminalRegistry,
    pub devices: Vec<Device>,
    pub connections: ConnectionGraph,
}

impl SimulationState {
    pub fn new(devices: Vec<Device>) -> SimResult<Self> {
        let registry = build_registry(&devices)?;
        Ok(Self {
            registry,
            devices,
            connections: ConnectionGraph::new(),
        })
    }

    /// Borrowed solver view.
    pub fn network(&self) -> SimResult<Network<'_>> {
        Ok(Network::new(
            &self.registry,
            &self.devices,
            &self.connections,
        )?)
    }

    pub fn device_idx(&self, id: &str) -> SimResult<DeviceIdx> {
        self.registry
            .device_idx(id)
            .ok_or_else(|| SimError::UnknownDevice { id: id.to_string() })
    }

    pub fn device(&self, id: &str) -> Option<&Device> {
        let idx = self.registry.device_idx(id)?;
        self.devices.get(idx.slot())
    }

    pub fn device_mut(&mut self, id: &str) -> SimResult<&mut Device> {
        let idx = self.device_idx(id)?;
        self.devices
            .get_mut(idx.slot())
            .ok_or_else(|| SimError::UnknownDevice { id: id.to_string() })
    }

    pub fn terminal(&self, id: &str) -> SimResult<TerminalIdx> {
        Ok(self.registry.resolve(id)?)
    }
}
