//! Fault injection and repair.
//!
//! Two families are tracked independently: an open (wire or internal) and a
//! leak. Injecting a fault replaces the active fault of its family.

use rand::Rng;
use rig_core::{DeviceIdx, TerminalIdx};
use rig_devices::DeviceKind;
use rig_graph::TerminalKind;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::state::SimulationState;

/// An injected fault, resolved to registry indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Electrical terminal no longer conducts or outputs.
    WireOpen(TerminalIdx),
    /// Sensor or load is open inside; its terminals still report cluster potentials.
    DeviceInternalOpen(DeviceIdx),
    /// Pneumatic terminal attenuates whatever pressure it records.
    PneumaticLeak(TerminalIdx),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultFamily {
    Open,
    Leak,
}

impl Fault {
    pub fn family(self) -> FaultFamily {
        match self {
            Fault::WireOpen(_) | Fault::DeviceInternalOpen(_) => FaultFamily::Open,
            Fault::PneumaticLeak(_) => FaultFamily::Leak,
        }
    }
}

/// A fault addressed by terminal or device id, as written in rig files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fault", content = "target", rename_all = "snake_case")]
pub enum FaultSpec {
    WireOpen(String),
    DeviceInternalOpen(String),
    PneumaticLeak(String),
}

impl FaultSpec {
    pub fn resolve(&self, state: &SimulationState) -> SimResult<Fault> {
        Ok(match self {
            FaultSpec::WireOpen(id) => Fault::WireOpen(state.terminal(id)?),
            FaultSpec::DeviceInternalOpen(id) => Fault::DeviceInternalOpen(state.device_idx(id)?),
            FaultSpec::PneumaticLeak(id) => Fault::PneumaticLeak(state.terminal(id)?),
        })
    }
}

/// Active fault records, at most one per family.
#[derive(Debug, Clone, Default)]
pub struct FaultModel {
    open: Option<Fault>,
    leak: Option<Fault>,
}

impl FaultModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active faults, open family first.
    pub fn active(&self) -> impl Iterator<Item = Fault> + '_ {
        self.open.iter().chain(self.leak.iter()).copied()
    }

    fn slot(&mut self, family: FaultFamily) -> &mut Option<Fault> {
        match family {
            FaultFamily::Open => &mut self.open,
            FaultFamily::Leak => &mut self.leak,
        }
    }

    /// Inject a fault, clearing the previous fault of the same family.
    pub fn inject(&mut self, state: &mut SimulationState, fault: Fault) -> SimResult<()> {
        check_target(state, fault)?;
        if let Some(old) = self.slot(fault.family()).take() {
            set_flag(state, old, false);
        }
        set_flag(state, fault, true);
        *self.slot(fault.family()) = Some(fault);
        tracing::info!(at = %describe(state, fault), family = ?fault.family(), "fault injected");
        Ok(())
    }

    /// Pick an eligible target of `family` uniformly and inject there.
    pub fn inject_random<R: Rng + ?Sized>(
        &mut self,
        state: &mut SimulationState,
        family: FaultFamily,
        rng: &mut R,
    ) -> SimResult<Fault> {
        let candidates = eligible(state, family);
        if candidates.is_empty() {
            return Err(SimError::InvalidArg {
                what: "no eligible fault target",
            });
        }
        let fault = candidates[rng.gen_range(0..candidates.len())];
        self.inject(state, fault)?;
        Ok(fault)
    }

    /// Clear both flags on a terminal and any active record pointing at it.
    ///
    /// Returns whether anything was active there.
    pub fn repair_terminal(&mut self, state: &mut SimulationState, t: TerminalIdx) -> bool {
        let mut repaired = false;
        if let Some(term) = state.registry.get_mut(t) {
            repaired = term.faults.any();
            term.faults = Default::default();
        }
        for family in [FaultFamily::Open, FaultFamily::Leak] {
            let slot = self.slot(family);
            if matches!(*slot, Some(Fault::WireOpen(x) | Fault::PneumaticLeak(x)) if x == t) {
                *slot = None;
                repaired = true;
            }
        }
        if repaired {
            tracing::info!(terminal = state.registry.id_of(t), "terminal repaired");
        }
        repaired
    }

    /// Clear a device's internal-open flag and its active record.
    pub fn repair_device(&mut self, state: &mut SimulationState, d: DeviceIdx) -> bool {
        let mut repaired = false;
        if let Some(flag) = state
            .devices
            .get_mut(d.slot())
            .and_then(|dev| internal_open(&mut dev.kind))
        {
            repaired = *flag;
            *flag = false;
        }
        if self.open == Some(Fault::DeviceInternalOpen(d)) {
            self.open = None;
            repaired = true;
        }
        if repaired {
            tracing::info!(device = state.registry.device_id(d).unwrap_or("?"), "device repaired");
        }
        repaired
    }

    /// Clear every flag and record.
    pub fn clear_all(&mut self, state: &mut SimulationState) {
        state.registry.clear_faults();
        for dev in &mut state.devices {
            if let Some(flag) = internal_open(&mut dev.kind) {
                *flag = false;
            }
        }
        self.open = None;
        self.leak = None;
        tracing::debug!("all faults cleared");
    }
}

fn internal_open(kind: &mut DeviceKind) -> Option<&mut bool> {
    match kind {
        DeviceKind::Sensor(s) => Some(&mut s.internal_open),
        DeviceKind::Load(l) => Some(&mut l.internal_open),
        _ => None,
    }
}

fn check_target(state: &SimulationState, fault: Fault) -> SimResult<()> {
    let (target, ok, reason) = match fault {
        Fault::WireOpen(t) => (
            t,
            state.registry.kind_of(t) == Some(TerminalKind::Electrical),
            "wire open needs an electrical terminal",
        ),
        Fault::PneumaticLeak(t) => (
            t,
            state.registry.kind_of(t) == Some(TerminalKind::Pneumatic),
            "leak needs a pneumatic terminal",
        ),
        Fault::DeviceInternalOpen(d) => {
            let ok = matches!(
                state.devices.get(d.slot()).map(|dev| &dev.kind),
                Some(DeviceKind::Sensor(_) | DeviceKind::Load(_))
            );
            if ok {
                return Ok(());
            }
            return Err(SimError::FaultTarget {
                target: describe(state, fault),
                reason: "internal open needs a sensor or load",
            });
        }
    };
    if ok {
        Ok(())
    } else {
        Err(SimError::FaultTarget {
            target: state.registry.id_of(target).to_string(),
            reason,
        })
    }
}

fn set_flag(state: &mut SimulationState, fault: Fault, on: bool) {
    match fault {
        Fault::WireOpen(t) => {
            if let Some(term) = state.registry.get_mut(t) {
                term.faults.broken = on;
            }
        }
        Fault::PneumaticLeak(t) => {
            if let Some(term) = state.registry.get_mut(t) {
                term.faults.leaking = on;
            }
        }
        Fault::DeviceInternalOpen(d) => {
            if let Some(flag) = state
                .devices
                .get_mut(d.slot())
                .and_then(|dev| internal_open(&mut dev.kind))
            {
                *flag = on;
            }
        }
    }
}

fn eligible(state: &SimulationState, family: FaultFamily) -> Vec<Fault> {
    match family {
        FaultFamily::Open => {
            let wires = state
                .registry
                .of_kind(TerminalKind::Electrical)
                .map(|t| Fault::WireOpen(t.idx));
            let devices = state
                .devices
                .iter()
                .enumerate()
                .filter(|(_, d)| matches!(d.kind, DeviceKind::Sensor(_) | DeviceKind::Load(_)))
                .map(|(i, _)| Fault::DeviceInternalOpen(DeviceIdx::from_slot(i)));
            wires.chain(devices).collect()
        }
        FaultFamily::Leak => state
            .registry
            .of_kind(TerminalKind::Pneumatic)
            .map(|t| Fault::PneumaticLeak(t.idx))
            .collect(),
    }
}

fn describe(state: &SimulationState, fault: Fault) -> String {
    match fault {
        Fault::WireOpen(t) | Fault::PneumaticLeak(t) => state.registry.id_of(t).to_string(),
        Fault::DeviceInternalOpen(d) => state.registry.device_id(d).unwrap_or("?").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rig_core::units::{bar, ohms, volts};
    use rig_devices::{Device, Load, Reservoir, Sensor, Source};

    fn state() -> SimulationState {
        SimulationState::new(vec![
            Device::new("dcP", DeviceKind::Source(Source::fixed(volts(24.0)))),
            Device::new("ptX", DeviceKind::Sensor(Sensor::new(bar(10.0)).unwrap())),
            Device::new("rsL", DeviceKind::Load(Load::new(ohms(250.0)))),
            Device::new("caB", DeviceKind::Reservoir(Reservoir::new(bar(8.0), 0.1).unwrap())),
        ])
        .unwrap()
    }

    #[test]
    fn same_family_replaces_previous() {
        let mut st = state();
        let mut faults = FaultModel::new();
        let p = st.terminal("dcP_wire_p").unwrap();
        let sensor = st.device_idx("ptX").unwrap();
        faults.inject(&mut st, Fault::WireOpen(p)).unwrap();
        assert!(st.registry.faults(p).broken);

        faults.inject(&mut st, Fault::DeviceInternalOpen(sensor)).unwrap();
        assert!(!st.registry.faults(p).broken);
        assert!(matches!(&st.devices[1].kind, DeviceKind::Sensor(s) if s.internal_open));
        assert_eq!(faults.active().collect::<Vec<_>>(), vec![Fault::DeviceInternalOpen(sensor)]);
    }

    #[test]
    fn families_are_independent() {
        let mut st = state();
        let mut faults = FaultModel::new();
        let p = st.terminal("dcP_wire_p").unwrap();
        let o = st.terminal("caB_pipe_o").unwrap();
        faults.inject(&mut st, Fault::WireOpen(p)).unwrap();
        faults.inject(&mut st, Fault::PneumaticLeak(o)).unwrap();
        assert_eq!(faults.active().count(), 2);
        assert!(faults.repair_terminal(&mut st, o));
        assert!(!st.registry.faults(o).leaking);
        assert_eq!(faults.active().collect::<Vec<_>>(), vec![Fault::WireOpen(p)]);
    }

    #[test]
    fn kind_mismatch_is_refused() {
        let mut st = state();
        let mut faults = FaultModel::new();
        let o = st.terminal("caB_pipe_o").unwrap();
        let src = st.device_idx("dcP").unwrap();
        assert!(matches!(
            faults.inject(&mut st, Fault::WireOpen(o)),
            Err(SimError::FaultTarget { .. })
        ));
        assert!(matches!(
            faults.inject(&mut st, Fault::DeviceInternalOpen(src)),
            Err(SimError::FaultTarget { .. })
        ));
        assert_eq!(faults.active().count(), 0);
    }

    #[test]
    fn random_leak_lands_on_a_pipe() {
        let mut st = state();
        let mut faults = FaultModel::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let fault = faults
            .inject_random(&mut st, FaultFamily::Leak, &mut rng)
            .unwrap();
        let Fault::PneumaticLeak(t) = fault else {
            panic!("expected a leak, got {fault:?}");
        };
        assert_eq!(st.registry.kind_of(t), Some(TerminalKind::Pneumatic));
        assert!(st.registry.faults(t).leaking);
        faults.clear_all(&mut st);
        assert!(!st.registry.faults(t).leaking);
        assert_eq!(faults.active().count(), 0);
    }

    #[test]
    fn fault_spec_reads_from_json() {
        let spec: FaultSpec =
            serde_json::from_str(r#"{"fault":"wire_open","target":"dcP_wire_p"}"#).unwrap();
        assert_eq!(spec, FaultSpec::WireOpen("dcP_wire_p".into()));
        let st = state();
        let p = st.terminal("dcP_wire_p").unwrap();
        assert_eq!(spec.resolve(&st).unwrap(), Fault::WireOpen(p));
    }
}
