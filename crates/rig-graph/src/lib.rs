//! rig-graph: terminal registry and connection layer for the training rig.
//!
//! Provides:
//! - Terminal data (kind, role, owner, fault flags) and the id convention
//!   `<deviceId>_<kindTag>_<role>`
//! - Incremental registry builder with validation
//! - The runtime connection set (typed wire/pipe edges) with request checks
//!
//! # Example
//!
//! ```
//! use rig_graph::{ConnectionGraph, LinkKind, RegistryBuilder, TerminalKind};
//!
//! let mut builder = RegistryBuilder::new();
//! let src = builder.add_device("dcP").unwrap();
//! builder.add_terminal(src, TerminalKind::Electrical, "p").unwrap();
//! let load = builder.add_device("rsL").unwrap();
//! builder.add_terminal(load, TerminalKind::Electrical, "a").unwrap();
//! let registry = builder.build().unwrap();
//!
//! let mut graph = ConnectionGraph::new();
//! graph.add_connection(&registry, "dcP_wire_p", "rsL_wire_a", LinkKind::Wire).unwrap();
//! assert_eq!(graph.len(), 1);
//! ```

pub mod connection;
pub mod error;
pub mod registry;
pub mod terminal;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use connection::{Connection, ConnectionGraph, ConnectionRecord, normalize};
pub use error::{GraphError, GraphResult};
pub use registry::{RegistryBuilder, TerminalRegistry};
pub use terminal::{FaultFlags, LinkKind, Terminal, TerminalAddress, TerminalKind, terminal_id};
