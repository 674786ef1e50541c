//! Network solvers for the training rig.
//!
//! Two passes run over a borrowed [`Network`] view, pneumatic first:
//! - [`pneumatic::solve`]: breadth-first pressure diffusion from every
//!   reservoir through pass-through devices, with stochastic leak attenuation
//! - [`electrical::solve`]: union-find clustering of wire terminals plus
//!   device bridging, closed-loop detection and voltage-drop settlement
//!
//! Meter readings are derived from the electrical solution by
//! [`meters::read_meters`]. No solver keeps state between calls.

pub mod electrical;
pub mod error;
pub mod meters;
pub mod pneumatic;
pub mod problem;

pub use electrical::{ElectricalSolution, LoopOrder, SETTLE_ROUNDS};
pub use error::{SolverError, SolverResult};
pub use meters::{MeterReading, read_meters};
pub use pneumatic::{LEAK_LOSS_MAX, LEAK_LOSS_MIN, PneumaticSolution};
pub use problem::{LoopRoles, Network};
