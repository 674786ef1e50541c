//! Error types for solver operations.

use rig_core::error::RigError;
use thiserror::Error;

/// Unexpected conditions inside a solver pass.
///
/// Expected absences (unconnected terminals, missing loop devices) are not
/// errors; they produce zero sentinels in the solution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Device {device} has no {role} terminal in the registry")]
    MissingTerminal { device: String, role: &'static str },

    #[error("Device index {index} is not in the device list")]
    MissingDevice { index: usize },

    #[error("Graph error: {0}")]
    Graph(#[from] rig_graph::GraphError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for RigError {
    fn from(e: SolverError) -> Self {
        RigError::Invariant {
            what: e.to_string(),
        }
    }
}
