//! Simulation layer for the training rig.
//!
//! Provides:
//! - `SimulationState`: registry, devices and connections owned in one place
//! - `FaultModel`: open and leak fault lifecycle, at most one per family
//! - `UpdateCycle`: pneumatic pass, electrical pass, device write-back and
//!   observer notification behind a single busy gate
//! - `Rig`: the facade a UI or script drives; every mutation runs a cycle
//! - `Snapshot`: serializable connection and device-state projection

pub mod cycle;
pub mod error;
pub mod faults;
pub mod rig;
pub mod snapshot;
pub mod state;

// Re-exports for public API
pub use cycle::{
    CycleGate, CycleObserver, CycleOutcome, CycleReport, GateGuard, LinkStatus, RigOptions,
    UpdateCycle,
};
pub use error::{SimError, SimResult};
pub use faults::{Fault, FaultFamily, FaultModel, FaultSpec};
pub use rig::Rig;
pub use snapshot::{DeviceState, Snapshot};
pub use state::SimulationState;
