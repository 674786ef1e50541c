//! Graph-specific error types.

use rig_core::RigError;

use crate::terminal::{LinkKind, TerminalKind};

pub type GraphResult<T> = Result<T, GraphError>;

/// Registry construction and connection request errors.
///
/// Every refusal leaves the existing connection set untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A terminal id is not present in the registry.
    UnknownTerminal { id: String },

    /// A device id is empty or breaks the terminal id convention.
    InvalidDeviceId { id: String },

    /// Two devices share an id.
    DuplicateDevice { id: String },

    /// A terminal id was registered twice.
    DuplicateTerminal { id: String },

    /// An endpoint's kind does not match the requested connection kind.
    TypeMismatch {
        terminal: String,
        expected: LinkKind,
        actual: TerminalKind,
    },

    /// The unordered pair is already connected.
    DuplicateConnection { from: String, to: String },

    /// A pipe terminal already carries its single connection.
    TerminalOccupied { terminal: String },

    /// Both endpoints are the same terminal.
    SelfConnection { terminal: String },

    /// Registry index tables disagree with the terminal list.
    InconsistentRegistry { what: &'static str },
}

impl GraphError {
    /// Stable reason code for UI annotation and logs.
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::UnknownTerminal { .. } => "unknown_terminal",
            GraphError::InvalidDeviceId { .. } => "invalid_device_id",
            GraphError::DuplicateDevice { .. } => "duplicate_device",
            GraphError::DuplicateTerminal { .. } => "duplicate_terminal",
            GraphError::TypeMismatch { .. } => "type_mismatch",
            GraphError::DuplicateConnection { .. } => "duplicate_connection",
            GraphError::TerminalOccupied { .. } => "terminal_occupied",
            GraphError::SelfConnection { .. } => "self_connection",
            GraphError::InconsistentRegistry { .. } => "inconsistent_registry",
        }
    }
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::UnknownTerminal { id } => write!(f, "Terminal {} is not registered", id),
            GraphError::InvalidDeviceId { id } => {
                write!(f, "Device id '{}' is empty or contains '_'", id)
            }
            GraphError::DuplicateDevice { id } => write!(f, "Device {} registered twice", id),
            GraphError::DuplicateTerminal { id } => {
                write!(f, "Terminal {} registered twice", id)
            }
            GraphError::TypeMismatch {
                terminal,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Terminal {} is {} but the connection is a {}",
                    terminal, actual, expected
                )
            }
            GraphError::DuplicateConnection { from, to } => {
                write!(f, "Connection {} <-> {} already exists", from, to)
            }
            GraphError::TerminalOccupied { terminal } => {
                write!(f, "Pipe terminal {} already has a connection", terminal)
            }
            GraphError::SelfConnection { terminal } => {
                write!(f, "Terminal {} cannot be connected to itself", terminal)
            }
            GraphError::InconsistentRegistry { what } => {
                write!(f, "Registry is inconsistent: {}", what)
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for RigError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnknownTerminal { id } => RigError::NotFound {
                what: "terminal",
                id,
            },
            other => RigError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_terminal() {
        let err = GraphError::TerminalOccupied {
            terminal: "vaV_pipe_i".into(),
        };
        assert!(err.to_string().contains("vaV_pipe_i"));
        assert_eq!(err.code(), "terminal_occupied");
    }

    #[test]
    fn unknown_terminal_maps_to_not_found() {
        let err: RigError = GraphError::UnknownTerminal { id: "x".into() }.into();
        assert!(matches!(err, RigError::NotFound { what: "terminal", .. }));
    }
}
