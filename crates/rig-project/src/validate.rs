//! Rig file validation logic.

use std::collections::HashSet;

use rig_graph::{ConnectionGraph, TerminalRegistry};

use crate::assemble::build_devices;
use crate::schema::{DeviceKindDef, RigFile, StepDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Connection {from} -> {to} refused: {reason}")]
    Connection {
        from: String,
        to: String,
        reason: &'static str,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_rig(rig: &RigFile) -> Result<(), ValidationError> {
    if rig.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: rig.version,
        });
    }

    if let Some(opts) = &rig.options {
        if !(opts.tick_s.is_finite() && opts.tick_s > 0.0) {
            return Err(invalid("options.tick_s", opts.tick_s, "must be positive"));
        }
    }

    let mut ids = HashSet::new();
    for dev in &rig.devices {
        if !ids.insert(dev.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: dev.id.clone(),
                context: "devices".to_string(),
            });
        }
        validate_device(&dev.id, &dev.kind)?;
    }

    let devices = build_devices(rig).map_err(|e| ValidationError::InvalidValue {
        field: "devices".to_string(),
        value: String::new(),
        reason: e.to_string(),
    })?;
    let registry =
        rig_devices::build_registry(&devices).map_err(|e| ValidationError::InvalidValue {
            field: "devices".to_string(),
            value: e.code().to_string(),
            reason: e.to_string(),
        })?;

    let mut graph = ConnectionGraph::new();
    for rec in &rig.connections {
        graph
            .add_connection(&registry, &rec.from, &rec.to, rec.kind)
            .map_err(|e| ValidationError::Connection {
                from: rec.from.clone(),
                to: rec.to.clone(),
                reason: e.code(),
            })?;
    }

    for (i, step) in rig.scenario.iter().enumerate() {
        validate_step(&registry, i, step)?;
    }
    Ok(())
}

fn validate_device(id: &str, kind: &DeviceKindDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("devices.{id}.{name}");
    // (field, value, zero allowed)
    let checks: Vec<(&str, f64, bool)> = match kind {
        DeviceKindDef::Source { volts, .. } => vec![("volts", *volts, true)],
        DeviceKindDef::Sensor { span_bar } => vec![("span_bar", *span_bar, false)],
        DeviceKindDef::Load { ohms, .. } => vec![("ohms", *ohms, true)],
        DeviceKindDef::Regulator { setpoint_bar } => vec![("setpoint_bar", *setpoint_bar, true)],
        DeviceKindDef::Reservoir {
            bar,
            depletion_bar_per_s,
        } => vec![
            ("bar", *bar, true),
            ("depletion_bar_per_s", *depletion_bar_per_s, true),
        ],
        _ => Vec::new(),
    };
    for (name, value, zero_ok) in checks {
        let ok = value.is_finite() && (value > 0.0 || (zero_ok && value == 0.0));
        if !ok {
            let reason = if zero_ok {
                "must be non-negative"
            } else {
                "must be positive"
            };
            return Err(invalid(&field(name), value, reason));
        }
    }
    Ok(())
}

fn validate_step(
    registry: &TerminalRegistry,
    index: usize,
    step: &StepDef,
) -> Result<(), ValidationError> {
    let context = format!("scenario step {index}");
    let device = |id: &str| {
        registry
            .device_idx(id)
            .map(|_| ())
            .ok_or_else(|| ValidationError::MissingReference {
                id: id.to_string(),
                context: context.clone(),
            })
    };
    let terminal = |id: &str| {
        registry
            .lookup(id)
            .map(|_| ())
            .ok_or_else(|| ValidationError::MissingReference {
                id: id.to_string(),
                context: context.clone(),
            })
    };
    match step {
        StepDef::Connect { from, to, .. } | StepDef::Disconnect { from, to } => {
            terminal(from)?;
            terminal(to)
        }
        StepDef::Set { device: id, .. }
        | StepDef::Power { device: id, .. }
        | StepDef::Mode { device: id, .. }
        | StepDef::Refill { device: id } => device(id),
        StepDef::Fault { fault } => match fault {
            rig_sim::FaultSpec::WireOpen(id) | rig_sim::FaultSpec::PneumaticLeak(id) => {
                terminal(id)
            }
            rig_sim::FaultSpec::DeviceInternalOpen(id) => device(id),
        },
        StepDef::Repair { target } => terminal(target).or_else(|_| device(target)),
        StepDef::Tick { seconds } if !(seconds.is_finite() && *seconds >= 0.0) => {
            Err(invalid(&format!("{context}.seconds"), *seconds, "must be non-negative"))
        }
        StepDef::RandomFault { .. } | StepDef::ClearFaults | StepDef::Tick { .. } => Ok(()),
    }
}

fn invalid(field: &str, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
