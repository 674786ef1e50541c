//! Rig file schema definitions.

use rig_devices::MeterMode;
use rig_graph::{ConnectionRecord, LinkKind};
use rig_sim::{FaultFamily, FaultSpec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RigFile {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionsDef>,
    #[serde(default)]
    pub devices: Vec<DeviceDef>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
    #[serde(default)]
    pub scenario: Vec<StepDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionsDef {
    #[serde(default)]
    pub seed: u64,
    /// Depletion tick period (seconds)
    #[serde(default = "default_tick")]
    pub tick_s: f64,
}

fn default_tick() -> f64 {
    0.1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceDef {
    pub id: String,
    pub kind: DeviceKindDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceKindDef {
    Source {
        volts: f64,
        #[serde(default)]
        adjustable: bool,
        #[serde(default)]
        on: bool,
    },
    Sensor {
        span_bar: f64,
    },
    Ammeter,
    Multimeter {
        #[serde(default)]
        mode: MeterMode,
    },
    Load {
        ohms: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range_ohms: Option<(f64, f64)>,
    },
    Switch {
        #[serde(default)]
        closed: bool,
    },
    Valve {
        #[serde(default)]
        open: bool,
    },
    Regulator {
        setpoint_bar: f64,
    },
    Tee,
    Reservoir {
        bar: f64,
        #[serde(default)]
        depletion_bar_per_s: f64,
    },
    Gauge,
}

/// One scripted user action. Each step is followed by an update cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepDef {
    Connect {
        from: String,
        to: String,
        #[serde(rename = "type")]
        kind: LinkKind,
    },
    Disconnect {
        from: String,
        to: String,
    },
    Set {
        device: String,
        value: f64,
    },
    Power {
        device: String,
        on: bool,
    },
    Mode {
        device: String,
        mode: MeterMode,
    },
    Fault {
        fault: FaultSpec,
    },
    RandomFault {
        family: FaultFamily,
    },
    Repair {
        target: String,
    },
    ClearFaults,
    Refill {
        device: String,
    },
    Tick {
        seconds: f64,
    },
}
