//! Electrical clustering, loop detection and voltage settlement.
//!
//! Wire terminals joined by wires (or by a conducting device) form a cluster
//! that shares one potential. The main loop is source(+), sensor, load,
//! source(-) in either order; when it closes, the sensor's operating current
//! sets the drop across the load.
//!
//! Bridging is applied in a single pass per solve. Two bridging devices in
//! series with no wire node between them are not merged further.
//!
//! An open (broken) terminal is cut out of the partition: wires and bridges
//! ending on it are skipped, so it floats with no cluster and reads 0 V.

use petgraph::unionfind::UnionFind;
use rig_core::units::{Current, Potential, amps, in_amps, ohmic_drop, volts};
use rig_core::{DeviceIdx, TerminalIdx};
use rig_devices::DeviceKind;
use rig_graph::{LinkKind, TerminalKind};

use crate::error::SolverResult;
use crate::pneumatic::PneumaticSolution;
use crate::problem::Network;

/// Fixed number of voltage-drop propagation rounds.
pub const SETTLE_ROUNDS: usize = 5;

/// Which loop device sits next to the positive rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOrder {
    /// `P - sensor - load - N`
    SensorFirst,
    /// `P - load - sensor - N`
    LoadFirst,
}

/// Result of one electrical pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectricalSolution {
    potentials: Vec<Potential>,
    clusters: Vec<Option<usize>>,
    live: Vec<Potential>,
    pub path_complete: bool,
    pub loop_current: Current,
    pub loop_order: Option<LoopOrder>,
    /// Clusters carrying loop current, positive rail first. Empty when open.
    pub loop_clusters: Vec<usize>,
}

impl ElectricalSolution {
    /// Potential of a terminal; 0 for unconnected or pneumatic terminals.
    pub fn potential(&self, t: TerminalIdx) -> Potential {
        self.potentials.get(t.slot()).copied().unwrap_or(volts(0.0))
    }

    /// Cluster of a terminal, `None` if nothing touches it or it is open.
    pub fn cluster(&self, t: TerminalIdx) -> Option<usize> {
        self.clusters.get(t.slot()).copied().flatten()
    }

    /// Live potential of a cluster.
    pub fn live(&self, cluster: usize) -> Potential {
        self.live.get(cluster).copied().unwrap_or(volts(0.0))
    }

    /// Voltage between two probe terminals; 0 if either probe floats.
    pub fn probe(&self, plus: TerminalIdx, minus: TerminalIdx) -> Potential {
        match (self.cluster(plus), self.cluster(minus)) {
            (Some(a), Some(b)) => self.live(a) - self.live(b),
            _ => volts(0.0),
        }
    }

    pub fn same_cluster(&self, a: TerminalIdx, b: TerminalIdx) -> bool {
        matches!((self.cluster(a), self.cluster(b)), (Some(x), Some(y)) if x == y)
    }

    /// Whether a cluster carries loop current.
    pub fn on_loop(&self, cluster: usize) -> bool {
        self.path_complete && self.loop_clusters.contains(&cluster)
    }
}

struct LoopTerminals {
    sensor: (TerminalIdx, TerminalIdx),
    load: (TerminalIdx, TerminalIdx),
}

/// Run one electrical pass. Sensor current is read from the pressure that
/// reached its inlet in `pneumatic`.
pub fn solve(net: &Network<'_>, pneumatic: &PneumaticSolution) -> SolverResult<ElectricalSolution> {
    let n = net.registry.len();
    let mut uf = UnionFind::<usize>::new(n);
    let mut attached = vec![false; n];

    let open = |t: TerminalIdx| net.registry.faults(t).broken;

    for c in net.connections.of_kind(LinkKind::Wire) {
        let [a, b] = c.ends;
        if open(a) || open(b) {
            continue;
        }
        uf.union(a.slot(), b.slot());
        attached[a.slot()] = true;
        attached[b.slot()] = true;
    }

    // Bridging pass
    for (i, dev) in net.devices.iter().enumerate() {
        let bridges = dev.kind.electrical().is_some_and(|e| e.bridges());
        if !bridges {
            continue;
        }
        let (a, b) = net.wire_pair(DeviceIdx::from_slot(i))?;
        if open(a) || open(b) {
            continue;
        }
        uf.union(a.slot(), b.slot());
        attached[a.slot()] = true;
        attached[b.slot()] = true;
    }

    let mut clusters = vec![None; n];
    for (slot, cluster) in clusters.iter_mut().enumerate() {
        if attached[slot] {
            *cluster = Some(uf.find_mut(slot));
        }
    }
    let cl = |t: TerminalIdx| clusters[t.slot()];

    let mut sol = ElectricalSolution {
        potentials: vec![volts(0.0); n],
        live: vec![volts(0.0); n],
        clusters: clusters.clone(),
        path_complete: false,
        loop_current: amps(0.0),
        loop_order: None,
        loop_clusters: Vec::new(),
    };

    let roles = net.loop_roles();
    let Some(src_idx) = roles.source else {
        return Ok(sol);
    };
    let DeviceKind::Source(source) = &net.device(src_idx)?.kind else {
        return Ok(sol);
    };
    let src = net.wire_pair(src_idx)?;
    let output = source.output();
    let (p, n_rail) = match (cl(src.0), cl(src.1)) {
        (Some(p), Some(q)) if p != q => (p, q),
        _ => return Ok(sol),
    };
    sol.live[p] = output;

    let (Some(sensor_idx), Some(load_idx)) = (roles.sensor, roles.load) else {
        return Ok(sol);
    };
    let (DeviceKind::Sensor(sensor), DeviceKind::Load(load)) = (
        &net.device(sensor_idx)?.kind,
        &net.device(load_idx)?.kind,
    ) else {
        return Ok(sol);
    };
    let terms = LoopTerminals {
        sensor: net.wire_pair(sensor_idx)?,
        load: net.wire_pair(load_idx)?,
    };

    let Some((order, junction)) = loop_order(&clusters, &terms, p, n_rail) else {
        return Ok(sol);
    };

    if !source.on {
        return Ok(sol);
    }

    let standing = sensor.internal_open || load.internal_open;
    let current = if standing {
        amps(0.0)
    } else {
        let mut reading = sensor.clone();
        let inlet = net.terminal(sensor_idx, TerminalKind::Pneumatic, "i")?;
        reading.pressure = pneumatic.pressure(inlet);
        reading.output_current()
    };
    let drop = ohmic_drop(current, load.resistance);

    let mut cluster_v = vec![volts(0.0); n];
    cluster_v[p] = output;
    cluster_v[n_rail] = volts(0.0);
    for _ in 0..SETTLE_ROUNDS {
        for (x, y) in [terms.load, (terms.load.1, terms.load.0)] {
            let (Some(cx), Some(cy)) = (cl(x), cl(y)) else {
                continue;
            };
            if cx == p {
                cluster_v[cy] = output - drop;
            } else if cy == n_rail {
                cluster_v[cx] = drop;
            }
        }
    }

    for t in TerminalIdx::all(n) {
        if let Some(c) = clusters[t.slot()] {
            sol.potentials[t.slot()] = cluster_v[c];
        }
    }
    for c in [p, junction, n_rail] {
        sol.live[c] = cluster_v[c];
    }

    sol.loop_order = Some(order);
    if !standing {
        sol.path_complete = true;
        sol.loop_current = current;
        sol.loop_clusters = vec![p, junction, n_rail];
    }
    tracing::trace!(
        ?order,
        standing,
        current_ma = in_amps(current) * 1e3,
        "electrical loop settled"
    );
    Ok(sol)
}

/// Match the loop in either order. Returns the order and the cluster joining
/// the sensor to the load.
fn loop_order(
    clusters: &[Option<usize>],
    t: &LoopTerminals,
    p: usize,
    n: usize,
) -> Option<(LoopOrder, usize)> {
    let cl = |x: TerminalIdx| clusters[x.slot()];
    let (sp, sn) = (cl(t.sensor.0)?, cl(t.sensor.1)?);
    let (la, lb) = (cl(t.load.0)?, cl(t.load.1)?);
    if sp == sn || la == lb {
        return None;
    }
    // the load end that is not `at`, if the load touches `at`
    let across = |at: usize| {
        if la == at {
            Some(lb)
        } else if lb == at {
            Some(la)
        } else {
            None
        }
    };
    if sp == p && across(n) == Some(sn) {
        return Some((LoopOrder::SensorFirst, sn));
    }
    if sn == n && across(p) == Some(sp) {
        return Some((LoopOrder::LoadFirst, sp));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pneumatic;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rig_core::units::{bar, in_volts, ohms};
    use rig_devices::{Device, Load, Sensor, Source, build_registry};
    use rig_graph::ConnectionGraph;

    fn loop_devices() -> Vec<Device> {
        let mut src = Source::fixed(volts(24.0));
        src.on = true;
        vec![
            Device::new("dcP", DeviceKind::Source(src)),
            Device::new("ptX", DeviceKind::Sensor(Sensor::new(bar(10.0)).unwrap())),
            Device::new("rsL", DeviceKind::Load(Load::new(ohms(250.0)))),
        ]
    }

    #[test]
    fn load_first_order_is_detected() {
        let devices = loop_devices();
        let reg = build_registry(&devices).unwrap();
        let mut g = ConnectionGraph::new();
        for (a, b) in [
            ("dcP_wire_p", "rsL_wire_a"),
            ("rsL_wire_b", "ptX_wire_p"),
            ("ptX_wire_n", "dcP_wire_n"),
        ] {
            g.add_connection(&reg, a, b, LinkKind::Wire).unwrap();
        }
        let net = Network::new(&reg, &devices, &g).unwrap();
        let pn = pneumatic::solve(&net, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        let sol = solve(&net, &pn).unwrap();
        assert!(sol.path_complete);
        assert_eq!(sol.loop_order, Some(LoopOrder::LoadFirst));
        // 4 mA at zero pressure through 250 ohm
        let b = reg.lookup("rsL_wire_b").unwrap();
        assert!((in_volts(sol.potential(b)) - 23.0).abs() < 1e-9);
    }

    #[test]
    fn shorted_source_never_closes() {
        let devices = loop_devices();
        let reg = build_registry(&devices).unwrap();
        let mut g = ConnectionGraph::new();
        g.add_connection(&reg, "dcP_wire_p", "dcP_wire_n", LinkKind::Wire)
            .unwrap();
        let net = Network::new(&reg, &devices, &g).unwrap();
        let pn = pneumatic::solve(&net, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        let sol = solve(&net, &pn).unwrap();
        assert!(!sol.path_complete);
        let p = reg.lookup("dcP_wire_p").unwrap();
        assert_eq!(in_volts(sol.potential(p)), 0.0);
    }

    #[test]
    fn floating_probe_reads_zero() {
        let devices = loop_devices();
        let reg = build_registry(&devices).unwrap();
        let g = ConnectionGraph::new();
        let net = Network::new(&reg, &devices, &g).unwrap();
        let pn = pneumatic::solve(&net, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        let sol = solve(&net, &pn).unwrap();
        let p = reg.lookup("dcP_wire_p").unwrap();
        let n = reg.lookup("dcP_wire_n").unwrap();
        assert_eq!(sol.cluster(p), None);
        assert_eq!(in_volts(sol.probe(p, n)), 0.0);
    }
}
