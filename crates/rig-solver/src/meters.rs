//! Meter readings derived from an electrical solution.

use rig_core::units::{in_milliamps, in_ohms, in_volts};
use rig_core::{DeviceIdx, TerminalIdx};
use rig_devices::{DeviceKind, MeterMode};

use crate::electrical::ElectricalSolution;
use crate::error::SolverResult;
use crate::problem::Network;

/// Load resistance at or below which continuity mode beeps across the load.
pub const CONTINUITY_MAX_OHMS: f64 = 50.0;

/// One meter's reading in its display unit (mA, V, ohm, or 0/1 continuity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterReading {
    pub device: DeviceIdx,
    pub value: f64,
}

/// Read every ammeter and multimeter on the rig.
pub fn read_meters(
    net: &Network<'_>,
    sol: &ElectricalSolution,
) -> SolverResult<Vec<MeterReading>> {
    let load = match net.loop_roles().load {
        Some(idx) => match &net.device(idx)?.kind {
            DeviceKind::Load(l) => Some((net.wire_pair(idx)?, l)),
            _ => None,
        },
        None => None,
    };

    let mut out = Vec::new();
    for (i, dev) in net.devices.iter().enumerate() {
        let idx = DeviceIdx::from_slot(i);
        let mode = match &dev.kind {
            DeviceKind::Ammeter(_) => MeterMode::Current,
            DeviceKind::Multimeter(m) => m.mode,
            _ => continue,
        };
        let (plus, minus) = net.wire_pair(idx)?;

        let across_load = |a: TerminalIdx, b: TerminalIdx| match load {
            Some(((la, lb), l)) if !l.internal_open => {
                let ends = (sol.cluster(la), sol.cluster(lb));
                let probes = (sol.cluster(a), sol.cluster(b));
                ends.0.is_some()
                    && ends.1.is_some()
                    && (probes == ends || probes == (ends.1, ends.0))
                    && ends.0 != ends.1
            }
            _ => false,
        };
        let load_ohms = load.map_or(f64::INFINITY, |(_, l)| in_ohms(l.resistance));

        let value = match mode {
            MeterMode::Current => match sol.cluster(plus) {
                Some(c) if sol.on_loop(c) => in_milliamps(sol.loop_current),
                _ => 0.0,
            },
            MeterMode::Voltage => in_volts(sol.probe(plus, minus)),
            MeterMode::Resistance if sol.same_cluster(plus, minus) => 0.0,
            MeterMode::Resistance if !sol.path_complete && across_load(plus, minus) => load_ohms,
            MeterMode::Resistance => f64::INFINITY,
            MeterMode::Continuity => {
                let closed = sol.same_cluster(plus, minus)
                    || (across_load(plus, minus) && load_ohms <= CONTINUITY_MAX_OHMS);
                f64::from(u8::from(closed))
            }
        };
        out.push(MeterReading { device: idx, value });
    }
    Ok(out)
}
