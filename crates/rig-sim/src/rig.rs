//! Facade over state, faults and the update cycle.
//!
//! Every mutating call is followed by an update cycle, so the rig's readings
//! always reflect the last accepted change.

use rig_core::units::Time;
use rig_devices::{Device, DeviceKind, MeterMode};
use rig_graph::LinkKind;

use crate::cycle::{CycleGate, CycleObserver, CycleOutcome, CycleReport, RigOptions, UpdateCycle};
use crate::error::{SimError, SimResult};
use crate::faults::{Fault, FaultFamily, FaultModel, FaultSpec};
use crate::snapshot::Snapshot;
use crate::state::SimulationState;

pub struct Rig {
    state: SimulationState,
    faults: FaultModel,
    cycle: UpdateCycle,
    opts: RigOptions,
}

impl Rig {
    /// Build a rig from its devices and run the first cycle.
    pub fn new(devices: Vec<Device>, opts: RigOptions) -> SimResult<Self> {
        let state = SimulationState::new(devices)?;
        let mut rig = Self {
            state,
            faults: FaultModel::new(),
            cycle: UpdateCycle::new(&opts),
            opts,
        };
        rig.refresh();
        Ok(rig)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn device(&self, id: &str) -> Option<&Device> {
        self.state.device(id)
    }

    pub fn report(&self) -> Option<&CycleReport> {
        self.cycle.last_report()
    }

    pub fn gate(&self) -> CycleGate {
        self.cycle.gate()
    }

    pub fn add_observer(&mut self, observer: Box<dyn CycleObserver>) {
        self.cycle.add_observer(observer);
    }

    pub fn active_faults(&self) -> Vec<Fault> {
        self.faults.active().collect()
    }

    /// Run a cycle without changing anything.
    pub fn refresh(&mut self) -> CycleOutcome {
        self.cycle.run(&mut self.state)
    }

    /// One depletion tick of the configured period.
    pub fn tick(&mut self) -> CycleOutcome {
        self.tick_by(self.opts.tick_period())
    }

    pub fn tick_by(&mut self, dt: Time) -> CycleOutcome {
        self.cycle.tick(&mut self.state, dt)
    }

    pub fn connect(&mut self, from: &str, to: &str, kind: LinkKind) -> SimResult<CycleOutcome> {
        let st = &mut self.state;
        st.connections.add_connection(&st.registry, from, to, kind)?;
        tracing::debug!(from, to, kind = kind.tag(), "connected");
        Ok(self.refresh())
    }

    /// Remove a link; absent links are a no-op but still refresh.
    pub fn disconnect(&mut self, from: &str, to: &str) -> CycleOutcome {
        if self.state.connections.remove_connection(from, to) {
            tracing::debug!(from, to, "disconnected");
        }
        self.refresh()
    }

    pub fn set_value(&mut self, device: &str, value: f64) -> SimResult<CycleOutcome> {
        self.state.device_mut(device)?.set_value(value)?;
        Ok(self.refresh())
    }

    /// Turn a supply on or off.
    pub fn switch_source(&mut self, device: &str, on: bool) -> SimResult<CycleOutcome> {
        let dev = self.state.device_mut(device)?;
        let DeviceKind::Source(src) = &mut dev.kind else {
            return Err(SimError::InvalidArg {
                what: "only a supply can be switched on or off",
            });
        };
        src.on = on;
        dev.update();
        Ok(self.refresh())
    }

    pub fn set_mode(&mut self, device: &str, mode: MeterMode) -> SimResult<CycleOutcome> {
        let dev = self.state.device_mut(device)?;
        let DeviceKind::Multimeter(m) = &mut dev.kind else {
            return Err(SimError::InvalidArg {
                what: "only a multimeter has a mode",
            });
        };
        m.set_mode(mode);
        dev.update();
        Ok(self.refresh())
    }

    /// Refill a reservoir to its initial charge.
    pub fn refill(&mut self, device: &str) -> SimResult<CycleOutcome> {
        let dev = self.state.device_mut(device)?;
        let DeviceKind::Reservoir(res) = &mut dev.kind else {
            return Err(SimError::InvalidArg {
                what: "only a reservoir can be refilled",
            });
        };
        res.refill();
        Ok(self.refresh())
    }

    pub fn inject(&mut self, spec: &FaultSpec) -> SimResult<CycleOutcome> {
        let fault = spec.resolve(&self.state)?;
        self.faults.inject(&mut self.state, fault)?;
        Ok(self.refresh())
    }

    pub fn inject_random(&mut self, family: FaultFamily) -> SimResult<Fault> {
        let fault = self
            .faults
            .inject_random(&mut self.state, family, self.cycle.rng())?;
        self.refresh();
        Ok(fault)
    }

    /// Repair whatever `target` names: a terminal id or a device id.
    pub fn repair(&mut self, target: &str) -> SimResult<CycleOutcome> {
        if let Some(t) = self.state.registry.lookup(target) {
            self.faults.repair_terminal(&mut self.state, t);
        } else if let Some(d) = self.state.registry.device_idx(target) {
            self.faults.repair_device(&mut self.state, d);
        } else {
            return Err(SimError::UnknownTarget {
                id: target.to_string(),
            });
        }
        Ok(self.refresh())
    }

    pub fn clear_faults(&mut self) -> CycleOutcome {
        self.faults.clear_all(&mut self.state);
        self.refresh()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn restore(&mut self, snapshot: &Snapshot) -> SimResult<CycleOutcome> {
        snapshot.restore(&mut self.state)?;
        Ok(self.refresh())
    }

    /// Drop every link and fault and return devices to their initial state.
    pub fn reset(&mut self) -> CycleOutcome {
        self.faults.clear_all(&mut self.state);
        self.state.connections.clear();
        for dev in &mut self.state.devices {
            dev.reset();
        }
        tracing::info!("rig reset");
        self.refresh()
    }
}
