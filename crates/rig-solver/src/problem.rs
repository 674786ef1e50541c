//! Borrowed view of the rig handed to each solver pass.

use rig_core::{DeviceIdx, TerminalIdx};
use rig_devices::{Device, DeviceKind};
use rig_graph::{ConnectionGraph, LinkKind, TerminalKind, TerminalRegistry};

use crate::error::{SolverError, SolverResult};

/// Everything a solver pass reads. Nothing here is mutated by the solvers.
#[derive(Clone, Copy)]
pub struct Network<'a> {
    pub registry: &'a TerminalRegistry,
    pub devices: &'a [Device],
    pub connections: &'a ConnectionGraph,
}

/// The devices forming the main current loop: the first source, sensor and
/// load in device order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopRoles {
    pub source: Option<DeviceIdx>,
    pub sensor: Option<DeviceIdx>,
    pub load: Option<DeviceIdx>,
}

impl<'a> Network<'a> {
    pub fn new(
        registry: &'a TerminalRegistry,
        devices: &'a [Device],
        connections: &'a ConnectionGraph,
    ) -> SolverResult<Self> {
        if registry.device_count() != devices.len() {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "registry knows {} devices but {} were supplied",
                    registry.device_count(),
                    devices.len()
                ),
            });
        }
        Ok(Self {
            registry,
            devices,
            connections,
        })
    }

    pub fn device(&self, idx: DeviceIdx) -> SolverResult<&'a Device> {
        self.devices
            .get(idx.slot())
            .ok_or(SolverError::MissingDevice { index: idx.slot() })
    }

    /// Resolve a device terminal; absence here is an internal error.
    pub fn terminal(
        &self,
        device: DeviceIdx,
        kind: TerminalKind,
        role: &'static str,
    ) -> SolverResult<TerminalIdx> {
        self.registry
            .terminal_at(device, kind, role)
            .ok_or_else(|| SolverError::MissingTerminal {
                device: self.registry.device_id(device).unwrap_or("?").to_string(),
                role,
            })
    }

    /// The two wire terminals of a device, in role order.
    pub fn wire_pair(&self, device: DeviceIdx) -> SolverResult<(TerminalIdx, TerminalIdx)> {
        let dev = self.device(device)?;
        let roles = dev
            .kind
            .electrical()
            .map(|e| e.wire_roles())
            .unwrap_or(&[]);
        match roles {
            [a, b, ..] => Ok((
                self.terminal(device, TerminalKind::Electrical, *a)?,
                self.terminal(device, TerminalKind::Electrical, *b)?,
            )),
            _ => Err(SolverError::ProblemSetup {
                what: format!("device {} has fewer than two wire terminals", dev.id),
            }),
        }
    }

    pub fn loop_roles(&self) -> LoopRoles {
        let mut roles = LoopRoles::default();
        for (i, dev) in self.devices.iter().enumerate() {
            let idx = DeviceIdx::from_slot(i);
            match dev.kind {
                DeviceKind::Source(_) if roles.source.is_none() => roles.source = Some(idx),
                DeviceKind::Sensor(_) if roles.sensor.is_none() => roles.sensor = Some(idx),
                DeviceKind::Load(_) if roles.load.is_none() => roles.load = Some(idx),
                _ => {}
            }
        }
        roles
    }

    /// Per-terminal neighbour lists over one link kind, in insertion order.
    pub(crate) fn adjacency(&self, kind: LinkKind) -> Vec<Vec<TerminalIdx>> {
        let mut adj = vec![Vec::new(); self.registry.len()];
        for c in self.connections.of_kind(kind) {
            let [a, b] = c.ends;
            adj[a.slot()].push(b);
            adj[b.slot()].push(a);
        }
        adj
    }
}
