//! Registry and connection request validation.

use std::collections::HashMap;

use rig_core::TerminalIdx;

use crate::connection::Connection;
use crate::error::{GraphError, GraphResult};
use crate::registry::TerminalRegistry;
use crate::terminal::{LinkKind, Terminal};

/// Device ids must be non-empty and free of `_` so terminal ids parse back.
pub(crate) fn check_device_id(id: &str) -> GraphResult<()> {
    if id.is_empty() || id.contains('_') || id.chars().any(char::is_whitespace) {
        return Err(GraphError::InvalidDeviceId { id: id.to_string() });
    }
    Ok(())
}

/// Validate the frozen index tables against the terminal list.
pub(crate) fn validate_registry(
    terminals: &[Terminal],
    by_id: &HashMap<String, TerminalIdx>,
    by_device: &[Vec<TerminalIdx>],
) -> GraphResult<()> {
    // Terminal indices must be contiguous and match their position
    for (i, t) in terminals.iter().enumerate() {
        if t.idx.slot() != i {
            return Err(GraphError::InconsistentRegistry {
                what: "terminal index does not match its slot",
            });
        }
    }

    if by_id.len() != terminals.len() {
        return Err(GraphError::InconsistentRegistry {
            what: "terminal id table size differs from terminal count",
        });
    }

    // Every terminal appears in exactly its owner's list
    let listed: usize = by_device.iter().map(Vec::len).sum();
    if listed != terminals.len() {
        return Err(GraphError::InconsistentRegistry {
            what: "device terminal lists do not cover every terminal",
        });
    }
    for (slot, list) in by_device.iter().enumerate() {
        for &t in list {
            if terminals[t.slot()].owner.slot() != slot {
                return Err(GraphError::InconsistentRegistry {
                    what: "terminal listed under the wrong device",
                });
            }
        }
    }

    Ok(())
}

/// Check a connection request against the registry and the current edges.
///
/// Returns both endpoint indices on success.
pub(crate) fn check_request(
    registry: &TerminalRegistry,
    edges: &[Connection],
    from: &str,
    to: &str,
    kind: LinkKind,
) -> GraphResult<(TerminalIdx, TerminalIdx)> {
    let a = registry.resolve(from)?;
    let b = registry.resolve(to)?;

    if a == b {
        return Err(GraphError::SelfConnection {
            terminal: from.to_string(),
        });
    }

    for (idx, id) in [(a, from), (b, to)] {
        let actual = registry
            .kind_of(idx)
            .ok_or_else(|| GraphError::UnknownTerminal { id: id.to_string() })?;
        if actual != kind.terminal_kind() {
            return Err(GraphError::TypeMismatch {
                terminal: id.to_string(),
                expected: kind,
                actual,
            });
        }
    }

    if edges.iter().any(|c| c.joins(a, b)) {
        let (lo, hi) = crate::connection::normalize(from, to);
        return Err(GraphError::DuplicateConnection {
            from: lo.to_string(),
            to: hi.to_string(),
        });
    }

    if kind == LinkKind::Pipe {
        for (idx, id) in [(a, from), (b, to)] {
            if edges.iter().any(|c| c.touches(idx)) {
                return Err(GraphError::TerminalOccupied {
                    terminal: id.to_string(),
                });
            }
        }
    }

    Ok((a, b))
}
