//! The runtime connection set.

use rig_core::TerminalIdx;
use serde::{Deserialize, Serialize};

use crate::error::GraphResult;
use crate::registry::TerminalRegistry;
use crate::terminal::LinkKind;
use crate::validate;

/// Canonical order of an unordered endpoint pair: lexicographic.
pub fn normalize<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Serializable connection record: `{from, to, type}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

/// An edge between two terminals. Endpoints are stored normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub kind: LinkKind,
    /// Registry indices of `from` and `to`, in that order.
    pub ends: [TerminalIdx; 2],
}

impl Connection {
    /// True if this edge joins `a` and `b` in either order.
    pub fn joins(&self, a: TerminalIdx, b: TerminalIdx) -> bool {
        (self.ends[0] == a && self.ends[1] == b) || (self.ends[0] == b && self.ends[1] == a)
    }

    pub fn touches(&self, t: TerminalIdx) -> bool {
        self.ends[0] == t || self.ends[1] == t
    }

    pub fn record(&self) -> ConnectionRecord {
        ConnectionRecord {
            from: self.from.clone(),
            to: self.to.clone(),
            kind: self.kind,
        }
    }
}

/// Owns the current set of typed edges, in insertion order.
///
/// Adding an edge never triggers a recompute; callers run the update cycle.
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    edges: Vec<Connection>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge after validating both endpoints.
    ///
    /// Refused requests leave the edge set untouched.
    pub fn add_connection(
        &mut self,
        registry: &TerminalRegistry,
        from: &str,
        to: &str,
        kind: LinkKind,
    ) -> GraphResult<&Connection> {
        let (a, b) = validate::check_request(registry, &self.edges, from, to, kind)?;
        let (lo, hi) = normalize(from, to);
        let ends = if lo == from { [a, b] } else { [b, a] };
        self.edges.push(Connection {
            from: lo.to_string(),
            to: hi.to_string(),
            kind,
            ends,
        });
        Ok(&self.edges[self.edges.len() - 1])
    }

    /// Remove the edge between `from` and `to`. Absent edges are a no-op.
    ///
    /// Returns whether an edge was removed.
    pub fn remove_connection(&mut self, from: &str, to: &str) -> bool {
        let (lo, hi) = normalize(from, to);
        let before = self.edges.len();
        self.edges.retain(|c| !(c.from == lo && c.to == hi));
        self.edges.len() != before
    }

    /// All edges in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.edges
    }

    /// Edges of one kind, in insertion order.
    pub fn of_kind(&self, kind: LinkKind) -> impl Iterator<Item = &Connection> + '_ {
        self.edges.iter().filter(move |c| c.kind == kind)
    }

    /// Edges touching a terminal, in insertion order.
    pub fn connections_of(&self, t: TerminalIdx) -> impl Iterator<Item = &Connection> + '_ {
        self.edges.iter().filter(move |c| c.touches(t))
    }

    /// Number of edges touching a terminal.
    pub fn degree(&self, t: TerminalIdx) -> usize {
        self.connections_of(t).count()
    }

    pub fn contains(&self, a: &str, b: &str) -> bool {
        let (lo, hi) = normalize(a, b);
        self.edges.iter().any(|c| c.from == lo && c.to == hi)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// Serializable copy of the edge set, in insertion order.
    pub fn records(&self) -> Vec<ConnectionRecord> {
        self.edges.iter().map(Connection::record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphError;
    use crate::registry::RegistryBuilder;
    use crate::terminal::TerminalKind;

    fn registry() -> TerminalRegistry {
        let mut b = RegistryBuilder::new();
        let d = b.add_device("dcP").unwrap();
        b.add_terminal(d, TerminalKind::Electrical, "p").unwrap();
        b.add_terminal(d, TerminalKind::Electrical, "n").unwrap();
        let l = b.add_device("rsL").unwrap();
        b.add_terminal(l, TerminalKind::Electrical, "a").unwrap();
        b.add_terminal(l, TerminalKind::Electrical, "b").unwrap();
        let v = b.add_device("vaV").unwrap();
        b.add_terminal(v, TerminalKind::Pneumatic, "i").unwrap();
        b.add_terminal(v, TerminalKind::Pneumatic, "o").unwrap();
        let t = b.add_device("teT").unwrap();
        b.add_terminal(t, TerminalKind::Pneumatic, "a").unwrap();
        b.add_terminal(t, TerminalKind::Pneumatic, "b").unwrap();
        b.build().unwrap()
    }

    #[test]
    fn normalize_sorts() {
        assert_eq!(normalize("b", "a"), ("a", "b"));
        assert_eq!(normalize("a", "b"), ("a", "b"));
    }

    #[test]
    fn add_stores_normalized_endpoints() {
        let reg = registry();
        let mut g = ConnectionGraph::new();
        let c = g
            .add_connection(&reg, "rsL_wire_a", "dcP_wire_p", LinkKind::Wire)
            .unwrap();
        assert_eq!(c.from, "dcP_wire_p");
        assert_eq!(c.to, "rsL_wire_a");
        assert_eq!(reg.id_of(c.ends[0]), "dcP_wire_p");
        assert_eq!(reg.id_of(c.ends[1]), "rsL_wire_a");
    }

    #[test]
    fn duplicate_in_either_order_is_refused() {
        let reg = registry();
        let mut g = ConnectionGraph::new();
        g.add_connection(&reg, "dcP_wire_p", "rsL_wire_a", LinkKind::Wire)
            .unwrap();
        let err = g
            .add_connection(&reg, "rsL_wire_a", "dcP_wire_p", LinkKind::Wire)
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateConnection { .. }));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn wire_terminals_allow_many_connections() {
        let reg = registry();
        let mut g = ConnectionGraph::new();
        g.add_connection(&reg, "dcP_wire_p", "rsL_wire_a", LinkKind::Wire)
            .unwrap();
        g.add_connection(&reg, "dcP_wire_p", "rsL_wire_b", LinkKind::Wire)
            .unwrap();
        let p = reg.lookup("dcP_wire_p").unwrap();
        assert_eq!(g.degree(p), 2);
    }

    #[test]
    fn pipe_terminal_takes_one_connection() {
        let reg = registry();
        let mut g = ConnectionGraph::new();
        g.add_connection(&reg, "vaV_pipe_o", "teT_pipe_a", LinkKind::Pipe)
            .unwrap();
        let err = g
            .add_connection(&reg, "vaV_pipe_o", "teT_pipe_b", LinkKind::Pipe)
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::TerminalOccupied {
                terminal: "vaV_pipe_o".into()
            }
        );
    }

    #[test]
    fn kind_mismatch_is_refused() {
        let reg = registry();
        let mut g = ConnectionGraph::new();
        let err = g
            .add_connection(&reg, "dcP_wire_p", "vaV_pipe_i", LinkKind::Wire)
            .unwrap_err();
        assert!(matches!(err, GraphError::TypeMismatch { .. }));
        let err = g
            .add_connection(&reg, "dcP_wire_p", "rsL_wire_a", LinkKind::Pipe)
            .unwrap_err();
        assert!(matches!(err, GraphError::TypeMismatch { .. }));
        assert!(g.is_empty());
    }

    #[test]
    fn self_and_unknown_are_refused() {
        let reg = registry();
        let mut g = ConnectionGraph::new();
        assert!(matches!(
            g.add_connection(&reg, "dcP_wire_p", "dcP_wire_p", LinkKind::Wire),
            Err(GraphError::SelfConnection { .. })
        ));
        assert!(matches!(
            g.add_connection(&reg, "dcP_wire_p", "nope_wire_x", LinkKind::Wire),
            Err(GraphError::UnknownTerminal { .. })
        ));
    }

    #[test]
    fn remove_absent_is_noop() {
        let reg = registry();
        let mut g = ConnectionGraph::new();
        assert!(!g.remove_connection("dcP_wire_p", "rsL_wire_a"));
        g.add_connection(&reg, "dcP_wire_p", "rsL_wire_a", LinkKind::Wire)
            .unwrap();
        assert!(g.remove_connection("rsL_wire_a", "dcP_wire_p"));
        assert!(g.is_empty());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let reg = registry();
        let mut g = ConnectionGraph::new();
        g.add_connection(&reg, "vaV_pipe_o", "teT_pipe_a", LinkKind::Pipe)
            .unwrap();
        g.add_connection(&reg, "dcP_wire_n", "rsL_wire_b", LinkKind::Wire)
            .unwrap();
        g.add_connection(&reg, "vaV_pipe_i", "teT_pipe_b", LinkKind::Pipe)
            .unwrap();
        let keys: Vec<_> = g.connections().iter().map(|c| c.from.as_str()).collect();
        assert_eq!(keys, vec!["teT_pipe_a", "dcP_wire_n", "teT_pipe_b"]);
        assert_eq!(g.of_kind(LinkKind::Pipe).count(), 2);
    }

    #[test]
    fn record_serializes_type_field() {
        let rec = ConnectionRecord {
            from: "a".into(),
            to: "b".into(),
            kind: LinkKind::Pipe,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"from":"a","to":"b","type":"pipe"}"#);
    }
}
