//! Terminal registry: stable, contiguous indices for every terminal.
//!
//! The registry is built once from the device list. Solvers address terminals
//! by [`TerminalIdx`] so union-find and diffusion run over plain arrays; the
//! string ids are only resolved at the edges (connection requests, output maps).

use std::collections::HashMap;

use rig_core::{DeviceIdx, TerminalIdx};

use crate::error::{GraphError, GraphResult};
use crate::terminal::{FaultFlags, Terminal, TerminalKind, terminal_id};
use crate::validate;

/// Builder for constructing a registry incrementally.
///
/// Use `add_device` and `add_terminal` to describe the rig, then call
/// `build()` to validate and freeze the index tables.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    device_ids: Vec<String>,
    terminals: Vec<Terminal>,
}

impl RegistryBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device and return its index.
    pub fn add_device(&mut self, id: impl Into<String>) -> GraphResult<DeviceIdx> {
        let id = id.into();
        validate::check_device_id(&id)?;
        if self.device_ids.iter().any(|d| *d == id) {
            return Err(GraphError::DuplicateDevice { id });
        }
        let idx = DeviceIdx::from_slot(self.device_ids.len());
        self.device_ids.push(id);
        Ok(idx)
    }

    /// Register a terminal on an already-added device.
    pub fn add_terminal(
        &mut self,
        device: DeviceIdx,
        kind: TerminalKind,
        role: &str,
    ) -> GraphResult<TerminalIdx> {
        let owner_id = self
            .device_ids
            .get(device.slot())
            .cloned()
            .ok_or(GraphError::InconsistentRegistry {
                what: "terminal added to an unknown device",
            })?;
        let id = terminal_id(&owner_id, kind, role);
        if self.terminals.iter().any(|t| t.id == id) {
            return Err(GraphError::DuplicateTerminal { id });
        }
        let idx = TerminalIdx::from_slot(self.terminals.len());
        self.terminals.push(Terminal {
            idx,
            id,
            kind,
            role: role.to_string(),
            owner: device,
            owner_id,
            faults: FaultFlags::default(),
        });
        Ok(idx)
    }

    /// Validate and freeze into a [`TerminalRegistry`].
    pub fn build(self) -> GraphResult<TerminalRegistry> {
        let mut by_id = HashMap::with_capacity(self.terminals.len());
        let mut by_device = vec![Vec::new(); self.device_ids.len()];
        for t in &self.terminals {
            by_id.insert(t.id.clone(), t.idx);
            by_device[t.owner.slot()].push(t.idx);
        }

        validate::validate_registry(&self.terminals, &by_id, &by_device)?;

        Ok(TerminalRegistry {
            device_ids: self.device_ids,
            terminals: self.terminals,
            by_id,
            by_device,
        })
    }
}

/// Frozen set of terminals with O(1) lookups in both directions.
#[derive(Debug, Clone)]
pub struct TerminalRegistry {
    device_ids: Vec<String>,
    terminals: Vec<Terminal>,
    by_id: HashMap<String, TerminalIdx>,
    /// Terminals of each device, in registration order.
    by_device: Vec<Vec<TerminalIdx>>,
}

impl TerminalRegistry {
    /// Number of registered terminals.
    pub fn len(&self) -> usize {
        self.terminals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminals.is_empty()
    }

    /// Number of registered devices.
    pub fn device_count(&self) -> usize {
        self.device_ids.len()
    }

    /// All terminals in index order.
    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    /// Get a terminal by index (None if out of bounds).
    pub fn get(&self, idx: TerminalIdx) -> Option<&Terminal> {
        self.terminals.get(idx.slot())
    }

    pub fn get_mut(&mut self, idx: TerminalIdx) -> Option<&mut Terminal> {
        self.terminals.get_mut(idx.slot())
    }

    /// Resolve a terminal id; None for unregistered ids.
    pub fn lookup(&self, id: &str) -> Option<TerminalIdx> {
        self.by_id.get(id).copied()
    }

    /// Resolve a terminal id or fail with `UnknownTerminal`.
    pub fn resolve(&self, id: &str) -> GraphResult<TerminalIdx> {
        self.lookup(id)
            .ok_or_else(|| GraphError::UnknownTerminal { id: id.to_string() })
    }

    /// String id of a terminal index; empty for out-of-range indices.
    pub fn id_of(&self, idx: TerminalIdx) -> &str {
        self.get(idx).map_or("", |t| t.id.as_str())
    }

    /// Device id by index.
    pub fn device_id(&self, device: DeviceIdx) -> Option<&str> {
        self.device_ids.get(device.slot()).map(String::as_str)
    }

    /// Device index by id.
    pub fn device_idx(&self, id: &str) -> Option<DeviceIdx> {
        self.device_ids
            .iter()
            .position(|d| d == id)
            .map(DeviceIdx::from_slot)
    }

    /// Terminals owned by a device.
    pub fn device_terminals(&self, device: DeviceIdx) -> &[TerminalIdx] {
        self.by_device
            .get(device.slot())
            .map_or(&[], |v| v.as_slice())
    }

    /// A device's terminal with the given kind and role.
    pub fn terminal_at(
        &self,
        device: DeviceIdx,
        kind: TerminalKind,
        role: &str,
    ) -> Option<TerminalIdx> {
        self.device_terminals(device).iter().copied().find(|&t| {
            self.terminals[t.slot()].kind == kind && self.terminals[t.slot()].role == role
        })
    }

    /// Kind of a terminal by index.
    pub fn kind_of(&self, idx: TerminalIdx) -> Option<TerminalKind> {
        self.get(idx).map(|t| t.kind)
    }

    /// Fault flags of a terminal; default (clear) for unknown indices.
    pub fn faults(&self, idx: TerminalIdx) -> FaultFlags {
        self.get(idx).map(|t| t.faults).unwrap_or_default()
    }

    /// Iterate over terminals of a kind.
    pub fn of_kind(&self, kind: TerminalKind) -> impl Iterator<Item = &Terminal> + '_ {
        self.terminals.iter().filter(move |t| t.kind == kind)
    }

    /// Clear every terminal fault flag.
    pub fn clear_faults(&mut self) {
        for t in &mut self.terminals {
            t.faults = FaultFlags::default();
        }
    }
}
