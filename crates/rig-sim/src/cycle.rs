//! The update cycle: solve both domains, write results back into devices,
//! notify observers.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rig_core::units::{
    Pressure, Time, bar, in_bar, in_milliamps, in_seconds, in_volts, milliamps, s,
};
use rig_core::{DeviceIdx, TerminalIdx};
use rig_devices::DeviceKind;
use rig_graph::{LinkKind, TerminalKind};
use rig_solver::{
    ElectricalSolution, MeterReading, PneumaticSolution, electrical, pneumatic, read_meters,
};
use serde::Serialize;

use crate::error::{SimError, SimResult};
use crate::state::SimulationState;

/// Engine tunables.
#[derive(Clone, Debug)]
pub struct RigOptions {
    /// Seed for leak fluctuation and random fault selection
    pub seed: u64,
    /// Period of the depletion tick (seconds)
    pub tick: f64,
}

impl Default for RigOptions {
    fn default() -> Self {
        Self { seed: 0, tick: 0.1 }
    }
}

impl RigOptions {
    pub fn tick_period(&self) -> Time {
        s(self.tick)
    }
}

/// Shared busy flag. Cloning shares the flag.
#[derive(Clone, Debug, Default)]
pub struct CycleGate(Rc<Cell<bool>>);

impl CycleGate {
    pub fn is_busy(&self) -> bool {
        self.0.get()
    }

    /// Claim the gate, or `None` if a cycle is already in flight.
    pub fn try_enter(&self) -> Option<GateGuard> {
        if self.0.replace(true) {
            return None;
        }
        Some(GateGuard(self.0.clone()))
    }
}

/// Releases the gate when dropped.
#[derive(Debug)]
pub struct GateGuard(Rc<Cell<bool>>);

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// What happened to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed,
    /// Another cycle held the gate; the trigger was discarded.
    Dropped,
    /// A solver pass failed; device values from the last good cycle remain.
    Failed,
}

/// Live status of one connection after a cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkStatus {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub live: bool,
}

/// Everything an observer needs after a cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    /// Count of completed cycles, this one included
    pub cycle: u64,
    pub path_complete: bool,
    pub loop_current_ma: f64,
    /// Electrical terminal id -> volts
    pub potentials: BTreeMap<String, f64>,
    /// Pneumatic terminal id -> bar
    pub pressures: BTreeMap<String, f64>,
    /// Device id -> primary value
    pub values: BTreeMap<String, f64>,
    /// Device id -> display text
    pub displays: BTreeMap<String, String>,
    pub links: Vec<LinkStatus>,
}

impl CycleReport {
    pub fn potential(&self, terminal: &str) -> f64 {
        self.potentials.get(terminal).copied().unwrap_or(0.0)
    }

    pub fn pressure(&self, terminal: &str) -> f64 {
        self.pressures.get(terminal).copied().unwrap_or(0.0)
    }

    pub fn value(&self, device: &str) -> f64 {
        self.values.get(device).copied().unwrap_or(0.0)
    }
}

/// Notified after every completed cycle (rendering, workflow checks).
pub trait CycleObserver {
    fn on_cycle(&mut self, report: &CycleReport);
}

/// Values written back into one device.
#[derive(Debug, Default)]
struct Derived {
    pressure: Option<Pressure>,
    reading: Option<f64>,
    consuming: Option<bool>,
    powered: bool,
}

struct Solved {
    pneumatic: PneumaticSolution,
    electrical: ElectricalSolution,
    derived: Vec<Derived>,
}

/// Runs solver passes over a [`SimulationState`] and owns the leak RNG.
pub struct UpdateCycle {
    gate: CycleGate,
    rng: ChaCha8Rng,
    observers: Vec<Box<dyn CycleObserver>>,
    completed: u64,
    last: Option<CycleReport>,
}

impl UpdateCycle {
    pub fn new(opts: &RigOptions) -> Self {
        Self {
            gate: CycleGate::default(),
            rng: ChaCha8Rng::seed_from_u64(opts.seed),
            observers: Vec::new(),
            completed: 0,
            last: None,
        }
    }

    pub fn gate(&self) -> CycleGate {
        self.gate.clone()
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn add_observer(&mut self, observer: Box<dyn CycleObserver>) {
        self.observers.push(observer);
    }

    /// Report of the last completed cycle.
    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last.as_ref()
    }

    /// Run one cycle unless one is already in flight.
    pub fn run(&mut self, state: &mut SimulationState) -> CycleOutcome {
        let Some(_guard) = self.gate.try_enter() else {
            tracing::debug!("update cycle busy, trigger dropped");
            return CycleOutcome::Dropped;
        };

        let solved = match self.solve(state) {
            Ok(solved) => solved,
            Err(e) => {
                tracing::warn!(error = %e, "update cycle failed, keeping previous values");
                return CycleOutcome::Failed;
            }
        };

        for (dev, derived) in state.devices.iter_mut().zip(&solved.derived) {
            apply(&mut dev.kind, derived);
            dev.set_power(derived.powered);
            dev.update();
        }

        self.completed += 1;
        let report = self.report(state, &solved);
        tracing::debug!(
            cycle = report.cycle,
            path_complete = report.path_complete,
            loop_current_ma = report.loop_current_ma,
            "update cycle completed"
        );
        for obs in &mut self.observers {
            obs.on_cycle(&report);
        }
        self.last = Some(report);
        CycleOutcome::Completed
    }

    /// Deplete consuming reservoirs by `dt`, then run a cycle.
    pub fn tick(&mut self, state: &mut SimulationState, dt: Time) -> CycleOutcome {
        if in_seconds(dt) > 0.0 {
            for dev in &mut state.devices {
                if let DeviceKind::Reservoir(res) = &mut dev.kind {
                    res.deplete(dt);
                }
            }
        }
        self.run(state)
    }

    fn solve(&mut self, state: &SimulationState) -> SimResult<Solved> {
        let net = state.network()?;
        let pn = pneumatic::solve(&net, &mut self.rng)?;
        let el = electrical::solve(&net, &pn)?;
        let meters = read_meters(&net, &el)?;
        let derived = derive(state, &pn, &el, &meters)?;
        Ok(Solved {
            pneumatic: pn,
            electrical: el,
            derived,
        })
    }

    fn report(&self, state: &SimulationState, solved: &Solved) -> CycleReport {
        let reg = &state.registry;
        let el = &solved.electrical;
        let pn = &solved.pneumatic;

        let mut potentials = BTreeMap::new();
        let mut pressures = BTreeMap::new();
        for t in reg.terminals() {
            match t.kind {
                TerminalKind::Electrical => {
                    potentials.insert(t.id.clone(), in_volts(el.potential(t.idx)));
                }
                TerminalKind::Pneumatic => {
                    pressures.insert(t.id.clone(), in_bar(pn.pressure(t.idx)));
                }
            }
        }

        let links = state
            .connections
            .connections()
            .iter()
            .map(|c| {
                let [a, b] = c.ends;
                let live = match c.kind {
                    LinkKind::Wire => {
                        el.cluster(a).is_some_and(|k| el.on_loop(k))
                            || in_volts(el.potential(a)) != 0.0
                            || in_volts(el.potential(b)) != 0.0
                    }
                    LinkKind::Pipe => in_bar(pn.pressure(a)) > 0.0 || in_bar(pn.pressure(b)) > 0.0,
                };
                LinkStatus {
                    from: c.from.clone(),
                    to: c.to.clone(),
                    kind: c.kind,
                    live,
                }
            })
            .collect();

        CycleReport {
            cycle: self.completed,
            path_complete: el.path_complete,
            loop_current_ma: in_milliamps(el.loop_current),
            potentials,
            pressures,
            values: state
                .devices
                .iter()
                .map(|d| (d.id.clone(), d.value()))
                .collect(),
            displays: state
                .devices
                .iter()
                .map(|d| (d.id.clone(), d.display().to_string()))
                .collect(),
            links,
        }
    }
}

fn derive(
    state: &SimulationState,
    pn: &PneumaticSolution,
    el: &ElectricalSolution,
    meters: &[MeterReading],
) -> SimResult<Vec<Derived>> {
    let reg = &state.registry;
    let port = |d: DeviceIdx, role: &'static str| -> SimResult<TerminalIdx> {
        reg.terminal_at(d, TerminalKind::Pneumatic, role)
            .ok_or_else(|| SimError::Backend {
                message: format!(
                    "device {} has no pipe_{role} port",
                    reg.device_id(d).unwrap_or("?")
                ),
            })
    };
    let pressure_at = |d: DeviceIdx, role: &'static str| -> SimResult<Pressure> {
        Ok(pn.pressure(port(d, role)?))
    };
    let live_wire = |d: DeviceIdx| {
        reg.device_terminals(d).iter().any(|&t| {
            reg.kind_of(t) == Some(TerminalKind::Electrical) && in_volts(el.potential(t)) != 0.0
        })
    };

    let mut out = Vec::with_capacity(state.devices.len());
    for (i, dev) in state.devices.iter().enumerate() {
        let d = DeviceIdx::from_slot(i);
        let derived = match &dev.kind {
            DeviceKind::Source(src) => Derived {
                powered: src.on,
                ..Default::default()
            },
            DeviceKind::Sensor(_) => Derived {
                pressure: Some(pressure_at(d, "i")?),
                powered: el.path_complete,
                ..Default::default()
            },
            DeviceKind::Ammeter(_) | DeviceKind::Multimeter(_) => {
                let reading = meters.iter().find(|m| m.device == d).map(|m| m.value);
                Derived {
                    reading,
                    powered: live_wire(d),
                    ..Default::default()
                }
            }
            DeviceKind::Load(_) => Derived {
                powered: el.path_complete,
                ..Default::default()
            },
            DeviceKind::Switch(_) => Derived {
                powered: live_wire(d),
                ..Default::default()
            },
            DeviceKind::Valve(v) => Derived {
                powered: v.open
                    && in_bar(pressure_at(d, "i")?).max(in_bar(pressure_at(d, "o")?)) > 0.0,
                ..Default::default()
            },
            DeviceKind::Regulator(_) => {
                let p = pn.device_output(d).unwrap_or(bar(0.0));
                Derived {
                    pressure: Some(p),
                    powered: in_bar(p) > 0.0,
                    ..Default::default()
                }
            }
            DeviceKind::Tee(_) => Derived {
                powered: ["a", "b", "c"]
                    .into_iter()
                    .map(|r| pressure_at(d, r))
                    .collect::<SimResult<Vec<_>>>()?
                    .into_iter()
                    .any(|p| in_bar(p) > 0.0),
                ..Default::default()
            },
            DeviceKind::Reservoir(res) => Derived {
                consuming: Some(pn.venting().contains(&d)),
                powered: in_bar(res.pressure) > 0.0,
                ..Default::default()
            },
            DeviceKind::Gauge(_) => {
                let p = pressure_at(d, "i")?;
                Derived {
                    pressure: Some(p),
                    powered: in_bar(p) > 0.0,
                    ..Default::default()
                }
            }
        };
        out.push(derived);
    }
    Ok(out)
}

fn apply(kind: &mut DeviceKind, derived: &Derived) {
    match kind {
        DeviceKind::Sensor(s) => {
            if let Some(p) = derived.pressure {
                s.pressure = p;
            }
        }
        DeviceKind::Ammeter(a) => {
            if let Some(v) = derived.reading {
                a.reading = milliamps(v);
            }
        }
        DeviceKind::Multimeter(m) => {
            if let Some(v) = derived.reading {
                m.reading = v;
            }
        }
        DeviceKind::Regulator(r) => {
            if let Some(p) = derived.pressure {
                r.last_output = p;
            }
        }
        DeviceKind::Reservoir(r) => {
            if let Some(c) = derived.consuming {
                r.consuming = c;
            }
        }
        DeviceKind::Gauge(g) => {
            if let Some(p) = derived.pressure {
                g.reading = p;
            }
        }
        _ => {}
    }
}
