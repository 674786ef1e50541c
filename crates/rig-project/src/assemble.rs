//! Turn a rig file into a running rig and replay its scenario.

use rig_core::units::{bar, ohms, s, volts};
use rig_devices::{
    Ammeter, Device, DeviceKind, Gauge, Load, Multimeter, Regulator, Reservoir, Sensor, Source,
    Switch, Tee, Valve,
};
use rig_sim::{CycleOutcome, Rig, RigOptions};

use crate::ProjectResult;
use crate::schema::{DeviceKindDef, RigFile, StepDef};

pub fn options(rig: &RigFile) -> RigOptions {
    match &rig.options {
        Some(o) => RigOptions {
            seed: o.seed,
            tick: o.tick_s,
        },
        None => RigOptions::default(),
    }
}

pub fn build_device(id: &str, kind: &DeviceKindDef) -> ProjectResult<Device> {
    let kind = match kind {
        DeviceKindDef::Source {
            volts: v,
            adjustable,
            on,
        } => {
            let mut src = if *adjustable {
                Source::adjustable(volts(*v))
            } else {
                Source::fixed(volts(*v))
            };
            src.on = *on;
            DeviceKind::Source(src)
        }
        DeviceKindDef::Sensor { span_bar } => DeviceKind::Sensor(Sensor::new(bar(*span_bar))?),
        DeviceKindDef::Ammeter => DeviceKind::Ammeter(Ammeter::new()),
        DeviceKindDef::Multimeter { mode } => DeviceKind::Multimeter(Multimeter::new(*mode)),
        DeviceKindDef::Load { ohms: r, range_ohms } => {
            let load = Load::new(ohms(*r));
            DeviceKind::Load(match range_ohms {
                Some((lo, hi)) => load.with_range(*lo, *hi),
                None => load,
            })
        }
        DeviceKindDef::Switch { closed } => DeviceKind::Switch(Switch::new(*closed)),
        DeviceKindDef::Valve { open } => DeviceKind::Valve(Valve::new(*open)),
        DeviceKindDef::Regulator { setpoint_bar } => {
            DeviceKind::Regulator(Regulator::new(bar(*setpoint_bar)))
        }
        DeviceKindDef::Tee => DeviceKind::Tee(Tee),
        DeviceKindDef::Reservoir {
            bar: p,
            depletion_bar_per_s,
        } => DeviceKind::Reservoir(Reservoir::new(bar(*p), *depletion_bar_per_s)?),
        DeviceKindDef::Gauge => DeviceKind::Gauge(Gauge::new()),
    };
    Ok(Device::new(id, kind))
}

pub fn build_devices(rig: &RigFile) -> ProjectResult<Vec<Device>> {
    rig.devices
        .iter()
        .map(|d| build_device(&d.id, &d.kind))
        .collect()
}

/// Build the rig and lay its initial connections. Scenario steps are not run.
pub fn build_rig(rig: &RigFile) -> ProjectResult<Rig> {
    let mut live = Rig::new(build_devices(rig)?, options(rig))?;
    for rec in &rig.connections {
        live.connect(&rec.from, &rec.to, rec.kind)?;
    }
    Ok(live)
}

/// Apply one scenario step.
pub fn run_step(rig: &mut Rig, step: &StepDef) -> ProjectResult<CycleOutcome> {
    let outcome = match step {
        StepDef::Connect { from, to, kind } => rig.connect(from, to, *kind)?,
        StepDef::Disconnect { from, to } => rig.disconnect(from, to),
        StepDef::Set { device, value } => rig.set_value(device, *value)?,
        StepDef::Power { device, on } => rig.switch_source(device, *on)?,
        StepDef::Mode { device, mode } => rig.set_mode(device, *mode)?,
        StepDef::Fault { fault } => rig.inject(fault)?,
        StepDef::RandomFault { family } => {
            rig.inject_random(*family)?;
            CycleOutcome::Completed
        }
        StepDef::Repair { target } => rig.repair(target)?,
        StepDef::ClearFaults => rig.clear_faults(),
        StepDef::Refill { device } => rig.refill(device)?,
        StepDef::Tick { seconds } => rig.tick_by(s(*seconds)),
    };
    Ok(outcome)
}
