//! Error types for simulation operations.

use rig_devices::DeviceError;
use rig_graph::GraphError;
use thiserror::Error;

/// Errors raised by the simulation layer.
///
/// Connection refusals keep their graph reason so callers can tell them
/// apart; solver failures are flattened to a message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown device: {id}")]
    UnknownDevice { id: String },

    #[error("Unknown terminal or device: {id}")]
    UnknownTarget { id: String },

    #[error("Cannot apply fault to {target}: {reason}")]
    FaultTarget {
        target: String,
        reason: &'static str,
    },

    #[error("Connection refused: {0}")]
    Connection(#[from] GraphError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<rig_solver::SolverError> for SimError {
    fn from(e: rig_solver::SolverError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<rig_core::RigError> for SimError {
    fn from(e: rig_core::RigError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
