//! Terminal data and the terminal id convention.

use core::fmt;

use rig_core::{DeviceIdx, TerminalIdx};
use serde::{Deserialize, Serialize};

/// Physical domain of a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalKind {
    /// Electrical terminal, joined by wires.
    Electrical,
    /// Pneumatic port, joined by pipes.
    Pneumatic,
}

impl TerminalKind {
    /// Tag used inside terminal ids (`wire` / `pipe`).
    pub fn tag(self) -> &'static str {
        self.link().tag()
    }

    /// The only link kind this terminal accepts.
    pub fn link(self) -> LinkKind {
        match self {
            TerminalKind::Electrical => LinkKind::Wire,
            TerminalKind::Pneumatic => LinkKind::Pipe,
        }
    }
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalKind::Electrical => f.write_str("electrical"),
            TerminalKind::Pneumatic => f.write_str("pneumatic"),
        }
    }
}

/// Kind of a user-created link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Wire,
    Pipe,
}

impl LinkKind {
    pub fn tag(self) -> &'static str {
        match self {
            LinkKind::Wire => "wire",
            LinkKind::Pipe => "pipe",
        }
    }

    /// Terminal kind both endpoints must have.
    pub fn terminal_kind(self) -> TerminalKind {
        match self {
            LinkKind::Wire => TerminalKind::Electrical,
            LinkKind::Pipe => TerminalKind::Pneumatic,
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Fault flags carried by a terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultFlags {
    /// Open circuit at this terminal.
    pub broken: bool,
    /// Air escapes at this port.
    pub leaking: bool,
}

impl FaultFlags {
    pub fn any(&self) -> bool {
        self.broken || self.leaking
    }
}

/// A named connection point owned by a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    pub idx: TerminalIdx,
    pub id: String,
    pub kind: TerminalKind,
    pub role: String,
    pub owner: DeviceIdx,
    pub owner_id: String,
    pub faults: FaultFlags,
}

/// Build a terminal id from its parts.
pub fn terminal_id(device_id: &str, kind: TerminalKind, role: &str) -> String {
    format!("{}_{}_{}", device_id, kind.tag(), role)
}

/// A parsed `<deviceId>_<kindTag>_<role>` id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalAddress<'a> {
    pub device_id: &'a str,
    pub kind: TerminalKind,
    pub role: &'a str,
}

impl<'a> TerminalAddress<'a> {
    /// Split a terminal id. Device ids never contain `_`, so the first
    /// separator ends the device part.
    pub fn parse(id: &'a str) -> Option<Self> {
        let (device_id, rest) = id.split_once('_')?;
        let (tag, role) = rest.split_once('_')?;
        let kind = match tag {
            "wire" => TerminalKind::Electrical,
            "pipe" => TerminalKind::Pneumatic,
            _ => return None,
        };
        if device_id.is_empty() || role.is_empty() {
            return None;
        }
        Some(Self {
            device_id,
            kind,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_convention() {
        assert_eq!(
            terminal_id("dcP", TerminalKind::Electrical, "p"),
            "dcP_wire_p"
        );
        assert_eq!(
            terminal_id("caB", TerminalKind::Pneumatic, "o"),
            "caB_pipe_o"
        );
    }

    #[test]
    fn parse_round_trip() {
        let addr = TerminalAddress::parse("muM_wire_com").unwrap();
        assert_eq!(addr.device_id, "muM");
        assert_eq!(addr.kind, TerminalKind::Electrical);
        assert_eq!(addr.role, "com");
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        assert!(TerminalAddress::parse("muM_hose_com").is_none());
        assert!(TerminalAddress::parse("muM").is_none());
        assert!(TerminalAddress::parse("muM_wire_").is_none());
    }

    #[test]
    fn link_and_terminal_kinds_pair_up() {
        assert_eq!(TerminalKind::Electrical.link(), LinkKind::Wire);
        assert_eq!(LinkKind::Pipe.terminal_kind(), TerminalKind::Pneumatic);
    }
}
