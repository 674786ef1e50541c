use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rig_core::units::{bar, in_bar, in_milliamps, in_volts, ohms, volts};
use rig_devices::{
    Ammeter, Device, DeviceKind, Gauge, Load, MeterMode, Multimeter, Regulator, Reservoir,
    Sensor, Source, Tee, Valve, build_registry,
};
use rig_graph::{ConnectionGraph, LinkKind, TerminalRegistry};
use rig_solver::{
    ElectricalSolution, LEAK_LOSS_MAX, LEAK_LOSS_MIN, LoopOrder, Network, PneumaticSolution,
    electrical, pneumatic, read_meters,
};

struct Bench {
    devices: Vec<Device>,
    registry: TerminalRegistry,
    graph: ConnectionGraph,
}

impl Bench {
    fn new(devices: Vec<Device>) -> Self {
        let registry = build_registry(&devices).unwrap();
        Self {
            devices,
            registry,
            graph: ConnectionGraph::new(),
        }
    }

    fn wire(&mut self, a: &str, b: &str) {
        self.graph
            .add_connection(&self.registry, a, b, LinkKind::Wire)
            .unwrap();
    }

    fn pipe(&mut self, a: &str, b: &str) {
        self.graph
            .add_connection(&self.registry, a, b, LinkKind::Pipe)
            .unwrap();
    }

    fn solve(&self, seed: u64) -> (PneumaticSolution, ElectricalSolution) {
        let net = Network::new(&self.registry, &self.devices, &self.graph).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pn = pneumatic::solve(&net, &mut rng).unwrap();
        let el = electrical::solve(&net, &pn).unwrap();
        (pn, el)
    }

    fn t(&self, id: &str) -> rig_core::TerminalIdx {
        self.registry.lookup(id).unwrap()
    }
}

fn electrical_bench(resistance: f64) -> Bench {
    let mut src = Source::fixed(volts(24.0));
    src.on = true;
    Bench::new(vec![
        Device::new("dcP", DeviceKind::Source(src)),
        Device::new("ptX", DeviceKind::Sensor(Sensor::new(bar(10.0)).unwrap())),
        Device::new("rsL", DeviceKind::Load(Load::new(ohms(resistance)))),
        Device::new("muM", DeviceKind::Multimeter(Multimeter::new(MeterMode::Voltage))),
        Device::new("caB", DeviceKind::Reservoir(Reservoir::new(bar(5.0), 0.0).unwrap())),
    ])
}

fn sensor_first(b: &mut Bench) {
    b.wire("dcP_wire_p", "ptX_wire_p");
    b.wire("ptX_wire_n", "rsL_wire_a");
    b.wire("rsL_wire_b", "dcP_wire_n");
}

#[test]
fn sensor_first_loop_closes_and_carries_sensor_current() {
    let mut b = electrical_bench(250.0);
    sensor_first(&mut b);
    b.pipe("caB_pipe_o", "ptX_pipe_i");
    let (_, el) = b.solve(1);
    assert!(el.path_complete);
    assert_eq!(el.loop_order, Some(LoopOrder::SensorFirst));
    // 5 bar on a 10 bar span is 12 mA
    assert!((in_milliamps(el.loop_current) - 12.0).abs() < 1e-9);
    let a = in_volts(el.potential(b.t("rsL_wire_a")));
    let bb = in_volts(el.potential(b.t("rsL_wire_b")));
    assert!((a - bb - 3.0).abs() < 1e-9);
    assert_eq!(in_volts(el.potential(b.t("dcP_wire_p"))), 24.0);
}

#[test]
fn source_off_leaves_everything_at_zero() {
    let mut b = electrical_bench(250.0);
    sensor_first(&mut b);
    if let DeviceKind::Source(s) = &mut b.devices[0].kind {
        s.on = false;
    }
    let (_, el) = b.solve(1);
    assert!(!el.path_complete);
    assert_eq!(in_milliamps(el.loop_current), 0.0);
    for t in b.registry.terminals() {
        assert_eq!(in_volts(el.potential(t.idx)), 0.0);
    }
}

#[test]
fn removing_one_wire_opens_loop_but_source_still_reads_nominal() {
    let mut b = electrical_bench(250.0);
    sensor_first(&mut b);
    b.wire("muM_wire_v", "dcP_wire_p");
    b.wire("muM_wire_com", "dcP_wire_n");
    assert!(b.graph.remove_connection("ptX_wire_n", "rsL_wire_a"));
    let (_, el) = b.solve(1);
    assert!(!el.path_complete);
    assert_eq!(in_milliamps(el.loop_current), 0.0);
    for t in b.registry.terminals() {
        assert_eq!(in_volts(el.potential(t.idx)), 0.0);
    }

    let net = Network::new(&b.registry, &b.devices, &b.graph).unwrap();
    let readings = read_meters(&net, &el).unwrap();
    assert_eq!(readings.len(), 1);
    assert!((readings[0].value - 24.0).abs() < 1e-9);
}

#[test]
fn output_open_zeroes_source_probe() {
    let mut b = electrical_bench(250.0);
    sensor_first(&mut b);
    b.wire("muM_wire_v", "dcP_wire_p");
    b.wire("muM_wire_com", "dcP_wire_n");
    let p = b.t("dcP_wire_p");
    b.registry.get_mut(p).unwrap().faults.broken = true;
    let (_, el) = b.solve(1);
    assert!(!el.path_complete);
    let net = Network::new(&b.registry, &b.devices, &b.graph).unwrap();
    assert_eq!(read_meters(&net, &el).unwrap()[0].value, 0.0);
}

#[test]
fn broken_probe_terminal_floats() {
    let mut b = electrical_bench(250.0);
    sensor_first(&mut b);
    b.wire("muM_wire_v", "dcP_wire_p");
    b.wire("muM_wire_com", "dcP_wire_n");
    let v = b.t("muM_wire_v");
    b.registry.get_mut(v).unwrap().faults.broken = true;
    let (_, el) = b.solve(1);
    // the meter is not part of the loop
    assert!(el.path_complete);
    assert_eq!(el.cluster(v), None);
    assert_eq!(in_volts(el.potential(v)), 0.0);
    assert_eq!(in_volts(el.probe(v, b.t("muM_wire_com"))), 0.0);
    let net = Network::new(&b.registry, &b.devices, &b.graph).unwrap();
    assert_eq!(read_meters(&net, &el).unwrap()[0].value, 0.0);
}

#[test]
fn drop_follows_sensor_current_beyond_the_supply() {
    let mut b = electrical_bench(2000.0);
    if let DeviceKind::Reservoir(res) = &mut b.devices[4].kind {
        res.set_pressure(10.0).unwrap();
    }
    sensor_first(&mut b);
    b.pipe("caB_pipe_o", "ptX_pipe_i");
    let (_, el) = b.solve(1);
    assert!(el.path_complete);
    assert!((in_milliamps(el.loop_current) - 20.0).abs() < 1e-9);
    let a = in_volts(el.potential(b.t("rsL_wire_a")));
    let bb = in_volts(el.potential(b.t("rsL_wire_b")));
    assert!((a - bb - 40.0).abs() < 1e-9);
}

#[test]
fn sensor_internal_open_keeps_standing_voltage() {
    let mut b = electrical_bench(250.0);
    sensor_first(&mut b);
    b.wire("muM_wire_v", "dcP_wire_p");
    b.wire("muM_wire_com", "dcP_wire_n");
    if let DeviceKind::Sensor(s) = &mut b.devices[1].kind {
        s.internal_open = true;
    }
    let (_, el) = b.solve(1);
    assert!(!el.path_complete);
    assert_eq!(in_milliamps(el.loop_current), 0.0);
    assert_eq!(in_volts(el.potential(b.t("ptX_wire_p"))), 24.0);
    let net = Network::new(&b.registry, &b.devices, &b.graph).unwrap();
    assert!((read_meters(&net, &el).unwrap()[0].value - 24.0).abs() < 1e-9);
}

#[test]
fn ammeter_in_series_reads_loop_current() {
    let mut src = Source::fixed(volts(24.0));
    src.on = true;
    let mut b = Bench::new(vec![
        Device::new("dcP", DeviceKind::Source(src)),
        Device::new("ptX", DeviceKind::Sensor(Sensor::new(bar(10.0)).unwrap())),
        Device::new("rsL", DeviceKind::Load(Load::new(ohms(250.0)))),
        Device::new("amA", DeviceKind::Ammeter(Ammeter::new())),
    ]);
    b.wire("dcP_wire_p", "amA_wire_p");
    b.wire("amA_wire_n", "ptX_wire_p");
    b.wire("ptX_wire_n", "rsL_wire_a");
    b.wire("rsL_wire_b", "dcP_wire_n");
    let (_, el) = b.solve(1);
    assert!(el.path_complete);
    let net = Network::new(&b.registry, &b.devices, &b.graph).unwrap();
    let readings = read_meters(&net, &el).unwrap();
    assert!((readings[0].value - 4.0).abs() < 1e-9);

    let a = b.t("amA_wire_p");
    b.registry.get_mut(a).unwrap().faults.broken = true;
    let (_, el) = b.solve(1);
    assert!(!el.path_complete);
    assert_eq!(in_milliamps(el.loop_current), 0.0);
    let net = Network::new(&b.registry, &b.devices, &b.graph).unwrap();
    assert_eq!(read_meters(&net, &el).unwrap()[0].value, 0.0);
}

#[test]
fn resistance_mode_reads_load_on_dead_loop() {
    let mut b = electrical_bench(470.0);
    if let DeviceKind::Multimeter(m) = &mut b.devices[3].kind {
        m.set_mode(MeterMode::Resistance);
    }
    b.wire("muM_wire_v", "rsL_wire_a");
    b.wire("muM_wire_com", "rsL_wire_b");
    let (_, el) = b.solve(1);
    let net = Network::new(&b.registry, &b.devices, &b.graph).unwrap();
    assert_eq!(read_meters(&net, &el).unwrap()[0].value, 470.0);

    if let DeviceKind::Load(l) = &mut b.devices[2].kind {
        l.internal_open = true;
    }
    let net = Network::new(&b.registry, &b.devices, &b.graph).unwrap();
    assert!(read_meters(&net, &el).unwrap()[0].value.is_infinite());
}

fn pneumatic_bench(valve_open: bool) -> Bench {
    let mut b = Bench::new(vec![
        Device::new("caB", DeviceKind::Reservoir(Reservoir::new(bar(50.0), 0.5).unwrap())),
        Device::new("vaV", DeviceKind::Valve(Valve::new(valve_open))),
        Device::new("rgR", DeviceKind::Regulator(Regulator::new(bar(5.0)))),
        Device::new("teT", DeviceKind::Tee(Tee)),
        Device::new("gaG", DeviceKind::Gauge(Gauge::new())),
    ]);
    b.pipe("caB_pipe_o", "vaV_pipe_i");
    b.pipe("vaV_pipe_o", "rgR_pipe_i");
    b.pipe("rgR_pipe_o", "teT_pipe_a");
    b.pipe("teT_pipe_b", "gaG_pipe_i");
    b
}

#[test]
fn regulated_line_reaches_gauge() {
    let b = pneumatic_bench(true);
    let (pn, _) = b.solve(7);
    assert!((in_bar(pn.pressure(b.t("gaG_pipe_i"))) - 5.0).abs() < 1e-9);
    assert!((in_bar(pn.pressure(b.t("teT_pipe_c"))) - 5.0).abs() < 1e-9);
    let rg = b.registry.device_idx("rgR").unwrap();
    assert!((in_bar(pn.device_output(rg).unwrap()) - 5.0).abs() < 1e-9);
}

#[test]
fn closed_valve_blocks_the_line() {
    let b = pneumatic_bench(false);
    let (pn, _) = b.solve(7);
    assert_eq!(in_bar(pn.pressure(b.t("gaG_pipe_i"))), 0.0);
    assert_eq!(in_bar(pn.pressure(b.t("vaV_pipe_i"))), 50.0);
}

#[test]
fn leak_free_diffusion_is_idempotent() {
    let b = pneumatic_bench(true);
    let (first, _) = b.solve(1);
    let (second, _) = b.solve(99);
    assert_eq!(first, second);
}

#[test]
fn leak_marks_reservoir_as_venting() {
    let mut b = pneumatic_bench(true);
    let c = b.t("teT_pipe_c");
    b.registry.get_mut(c).unwrap().faults.leaking = true;
    let (pn, _) = b.solve(3);
    assert_eq!(pn.venting(), &[b.registry.device_idx("caB").unwrap()]);
    // the healthy branch is untouched
    assert!((in_bar(pn.pressure(b.t("gaG_pipe_i"))) - 5.0).abs() < 1e-9);
}

proptest! {
    #[test]
    fn load_drop_is_current_times_resistance(
        r in 10.0f64..5000.0,
        p in 0.0f64..10.0,
        flipped in any::<bool>(),
    ) {
        let mut b = electrical_bench(r);
        if let DeviceKind::Reservoir(res) = &mut b.devices[4].kind {
            res.set_pressure(p).unwrap();
        }
        b.pipe("caB_pipe_o", "ptX_pipe_i");
        let (near, far) = if flipped {
            ("rsL_wire_b", "rsL_wire_a")
        } else {
            ("rsL_wire_a", "rsL_wire_b")
        };
        b.wire("dcP_wire_p", "ptX_wire_p");
        b.wire("ptX_wire_n", near);
        b.wire(far, "dcP_wire_n");
        let (_, el) = b.solve(0);
        prop_assert!(el.path_complete);
        let i = (4.0 + 16.0 * p / 10.0) / 1000.0;
        let drop = (in_volts(el.potential(b.t(near))) - in_volts(el.potential(b.t(far)))).abs();
        prop_assert!((drop - i * r).abs() < 1e-9);
    }

    #[test]
    fn leak_loss_stays_in_range(seed in any::<u64>()) {
        let mut b = pneumatic_bench(true);
        let g = b.t("gaG_pipe_i");
        b.registry.get_mut(g).unwrap().faults.leaking = true;
        let (pn, _) = b.solve(seed);
        let reading = in_bar(pn.pressure(g));
        prop_assert!(reading >= 5.0 * (1.0 - LEAK_LOSS_MAX) - 1e-9);
        prop_assert!(reading <= 5.0 * (1.0 - LEAK_LOSS_MIN) + 1e-9);
    }
}
