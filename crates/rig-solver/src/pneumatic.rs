//! Breadth-first pressure diffusion.
//!
//! Pressure is seeded at every reservoir outlet and spreads along pipe
//! connections. Arriving at a device port runs that device's transform
//! (tee replicates, valve gates, regulator clamps, gauges and transducers
//! absorb). Each terminal is finalized once per pass: the first path to reach
//! it wins, in connection insertion order. That tie-break is an ordering
//! artefact of the diffusion, kept stable so results are reproducible.

use std::collections::VecDeque;

use rand::Rng;
use rig_core::units::{Pressure, bar, in_bar};
use rig_core::{DeviceIdx, TerminalIdx};
use rig_devices::DeviceKind;
use rig_graph::{LinkKind, TerminalKind};

use crate::error::SolverResult;
use crate::problem::Network;

/// Smallest fraction of pressure lost at a leaking terminal.
pub const LEAK_LOSS_MIN: f64 = 0.20;
/// Largest fraction of pressure lost at a leaking terminal.
pub const LEAK_LOSS_MAX: f64 = 0.30;

/// Result of one diffusion pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PneumaticSolution {
    /// Pressure per terminal slot; 0 for unreached or electrical terminals.
    pressures: Vec<Pressure>,
    reached: Vec<bool>,
    /// Output reported by a pass-through device (regulators), per device slot.
    device_outputs: Vec<Option<Pressure>>,
    /// Reservoirs whose air reached a leaking terminal this pass.
    venting: Vec<DeviceIdx>,
}

impl PneumaticSolution {
    /// Pressure at a terminal; 0 for unreached terminals.
    pub fn pressure(&self, t: TerminalIdx) -> Pressure {
        self.pressures.get(t.slot()).copied().unwrap_or(bar(0.0))
    }

    pub fn reached(&self, t: TerminalIdx) -> bool {
        self.reached.get(t.slot()).copied().unwrap_or(false)
    }

    /// Output a pass-through device produced this pass, if any.
    pub fn device_output(&self, d: DeviceIdx) -> Option<Pressure> {
        self.device_outputs.get(d.slot()).copied().flatten()
    }

    pub fn venting(&self) -> &[DeviceIdx] {
        &self.venting
    }
}

struct Diffusion<'r, R: Rng + ?Sized> {
    pressures: Vec<Pressure>,
    reached: Vec<bool>,
    origin: Vec<Option<DeviceIdx>>,
    venting: Vec<DeviceIdx>,
    rng: &'r mut R,
}

impl<R: Rng + ?Sized> Diffusion<'_, R> {
    /// Finalize a terminal, attenuating if it leaks.
    fn record(&mut self, t: TerminalIdx, p: Pressure, leaking: bool, seed: DeviceIdx) {
        let mut value = in_bar(p);
        if leaking {
            let loss = self.rng.gen_range(LEAK_LOSS_MIN..=LEAK_LOSS_MAX);
            value *= 1.0 - loss;
            if value > 0.0 && !self.venting.contains(&seed) {
                self.venting.push(seed);
            }
        }
        self.pressures[t.slot()] = bar(value);
        self.reached[t.slot()] = true;
        self.origin[t.slot()] = Some(seed);
    }
}

/// Run one diffusion pass.
///
/// `rng` draws the leak attenuation; a leak-free network never touches it, so
/// repeated passes over a static leak-free network are identical.
pub fn solve<R: Rng + ?Sized>(net: &Network<'_>, rng: &mut R) -> SolverResult<PneumaticSolution> {
    let n = net.registry.len();
    let adjacency = net.adjacency(LinkKind::Pipe);
    let mut device_outputs = vec![None; net.devices.len()];
    let mut pass = Diffusion {
        pressures: vec![bar(0.0); n],
        reached: vec![false; n],
        origin: vec![None; n],
        venting: Vec::new(),
        rng,
    };
    let mut queue = VecDeque::new();

    // Seed every reservoir outlet, in device order
    for (i, dev) in net.devices.iter().enumerate() {
        if let DeviceKind::Reservoir(res) = &dev.kind {
            let d = DeviceIdx::from_slot(i);
            let outlet = net.terminal(d, TerminalKind::Pneumatic, "o")?;
            if pass.reached[outlet.slot()] {
                continue;
            }
            let leaking = net.registry.faults(outlet).leaking;
            pass.record(outlet, res.pressure, leaking, d);
            queue.push_back(outlet);
        }
    }

    while let Some(t) = queue.pop_front() {
        let p = pass.pressures[t.slot()];
        let Some(seed) = pass.origin[t.slot()] else {
            continue;
        };

        for &other in &adjacency[t.slot()] {
            if pass.reached[other.slot()] {
                continue;
            }
            let Some(port) = net.registry.get(other) else {
                continue;
            };
            pass.record(other, p, port.faults.leaking, seed);

            let owner = port.owner;
            let Some(node) = net.device(owner)?.kind.pneumatic() else {
                continue;
            };
            let arrived = pass.pressures[other.slot()];
            for (role, out) in node.transform(&port.role, arrived) {
                let q = net.terminal(owner, TerminalKind::Pneumatic, role)?;
                if matches!(net.device(owner)?.kind, DeviceKind::Regulator(_)) {
                    device_outputs[owner.slot()] = Some(out);
                }
                if pass.reached[q.slot()] {
                    continue;
                }
                let leaking = net.registry.faults(q).leaking;
                pass.record(q, out, leaking, seed);
                queue.push_back(q);
            }
        }
    }

    tracing::trace!(
        reached = pass.reached.iter().filter(|&&r| r).count(),
        venting = pass.venting.len(),
        "pneumatic pass finished"
    );

    Ok(PneumaticSolution {
        pressures: pass.pressures,
        reached: pass.reached,
        device_outputs,
        venting: pass.venting,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rig_core::units::bar;
    use rig_devices::{Device, Gauge, Reservoir, Tee, build_registry};
    use rig_graph::ConnectionGraph;

    #[test]
    fn reservoir_feeds_gauge_directly() {
        let devices = vec![
            Device::new(
                "caB",
                DeviceKind::Reservoir(Reservoir::new(bar(8.0), 0.0).unwrap()),
            ),
            Device::new("gaG", DeviceKind::Gauge(Gauge::new())),
        ];
        let reg = build_registry(&devices).unwrap();
        let mut g = ConnectionGraph::new();
        g.add_connection(&reg, "caB_pipe_o", "gaG_pipe_i", LinkKind::Pipe)
            .unwrap();
        let net = Network::new(&reg, &devices, &g).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sol = solve(&net, &mut rng).unwrap();
        let gauge = reg.lookup("gaG_pipe_i").unwrap();
        assert_eq!(in_bar(sol.pressure(gauge)), 8.0);
        assert!(sol.venting().is_empty());
    }

    #[test]
    fn unconnected_ports_read_zero() {
        let devices = vec![
            Device::new(
                "caB",
                DeviceKind::Reservoir(Reservoir::new(bar(8.0), 0.0).unwrap()),
            ),
            Device::new("teT", DeviceKind::Tee(Tee)),
        ];
        let reg = build_registry(&devices).unwrap();
        let g = ConnectionGraph::new();
        let net = Network::new(&reg, &devices, &g).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sol = solve(&net, &mut rng).unwrap();
        let tee_a = reg.lookup("teT_pipe_a").unwrap();
        assert_eq!(in_bar(sol.pressure(tee_a)), 0.0);
        assert!(!sol.reached(tee_a));
    }
}
