//! Shared error type for the rig workspace.

use thiserror::Error;

pub type RigResult<T> = Result<T, RigError>;

/// Lowest common error; every crate-level error converts into it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown {what}: {id}")]
    NotFound { what: &'static str, id: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
