//! Error types for device operations.

use rig_core::error::RigError;
use thiserror::Error;

/// Errors raised by device setters and constructors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Device {device} has no adjustable value")]
    NotAdjustable { device: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type DeviceResult<T> = Result<T, DeviceError>;

impl From<RigError> for DeviceError {
    fn from(e: RigError) -> Self {
        match e {
            RigError::NonFinite { what, .. } => DeviceError::NonPhysical { what },
            RigError::InvalidArg { what } => DeviceError::InvalidArg { what },
            _ => DeviceError::InvalidArg {
                what: "unexpected core error",
            },
        }
    }
}

impl From<DeviceError> for RigError {
    fn from(e: DeviceError) -> Self {
        match e {
            DeviceError::NonPhysical { what } => RigError::InvalidArg { what },
            DeviceError::NotAdjustable { device } => RigError::Invariant {
                what: format!("device {device} is not adjustable"),
            },
            DeviceError::InvalidArg { what } => RigError::InvalidArg { what },
        }
    }
}
