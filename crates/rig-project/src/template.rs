//! Built-in rig layouts.

use rig_devices::MeterMode;
use rig_graph::{ConnectionRecord, LinkKind};

use crate::schema::{DeviceDef, DeviceKindDef, OptionsDef, RigFile, StepDef};
use crate::validate::LATEST_VERSION;

fn device(id: &str, kind: DeviceKindDef) -> DeviceDef {
    DeviceDef {
        id: id.to_string(),
        kind,
    }
}

fn link(from: &str, to: &str, kind: LinkKind) -> ConnectionRecord {
    ConnectionRecord {
        from: from.to_string(),
        to: to.to_string(),
        kind,
    }
}

/// The bench as delivered: 24 V supply, 0-10 bar transducer on a 250 ohm
/// loop resistor, panel ammeter and a handheld multimeter on the electrical
/// side; a 50 bar reservoir feeding a shut-off valve, a 5 bar regulator and a
/// tee to the gauge and the transducer on the pneumatic side.
///
/// Only the pneumatic line is pre-piped. The scenario wires the loop, powers
/// it, measures across the supply and then opens the transducer.
pub fn standard_rig() -> RigFile {
    let devices = vec![
        device(
            "dcP",
            DeviceKindDef::Source {
                volts: 24.0,
                adjustable: false,
                on: false,
            },
        ),
        device("ptX", DeviceKindDef::Sensor { span_bar: 10.0 }),
        device(
            "rsL",
            DeviceKindDef::Load {
                ohms: 250.0,
                range_ohms: Some((0.0, 1000.0)),
            },
        ),
        device("amA", DeviceKindDef::Ammeter),
        device(
            "muM",
            DeviceKindDef::Multimeter {
                mode: MeterMode::Voltage,
            },
        ),
        device(
            "caB",
            DeviceKindDef::Reservoir {
                bar: 50.0,
                depletion_bar_per_s: 0.5,
            },
        ),
        device("vaV", DeviceKindDef::Valve { open: true }),
        device("rgR", DeviceKindDef::Regulator { setpoint_bar: 5.0 }),
        device("teT", DeviceKindDef::Tee),
        device("gaG", DeviceKindDef::Gauge),
    ];

    let connections = vec![
        link("caB_pipe_o", "vaV_pipe_i", LinkKind::Pipe),
        link("rgR_pipe_i", "vaV_pipe_o", LinkKind::Pipe),
        link("rgR_pipe_o", "teT_pipe_a", LinkKind::Pipe),
        link("gaG_pipe_i", "teT_pipe_b", LinkKind::Pipe),
        link("ptX_pipe_i", "teT_pipe_c", LinkKind::Pipe),
    ];

    let wire = |from: &str, to: &str| StepDef::Connect {
        from: from.to_string(),
        to: to.to_string(),
        kind: LinkKind::Wire,
    };
    let scenario = vec![
        wire("amA_wire_p", "dcP_wire_p"),
        wire("amA_wire_n", "ptX_wire_p"),
        wire("ptX_wire_n", "rsL_wire_a"),
        wire("dcP_wire_n", "rsL_wire_b"),
        StepDef::Power {
            device: "dcP".to_string(),
            on: true,
        },
        wire("dcP_wire_p", "muM_wire_v"),
        wire("dcP_wire_n", "muM_wire_com"),
        StepDef::Fault {
            fault: rig_sim::FaultSpec::DeviceInternalOpen("ptX".to_string()),
        },
        StepDef::Repair {
            target: "ptX".to_string(),
        },
        StepDef::Tick { seconds: 1.0 },
    ];

    RigFile {
        version: LATEST_VERSION,
        name: "Standard training rig".to_string(),
        options: Some(OptionsDef {
            seed: 0,
            tick_s: 0.1,
        }),
        devices,
        connections,
        scenario,
    }
}
