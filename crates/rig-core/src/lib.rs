//! rig-core: shared foundation for the training-rig engine.
//!
//! Contains:
//! - units (uom SI quantities with bar, volt, milliamp and ohm helpers)
//! - numeric (finite and non-negative guards for setters)
//! - ids (compact arena indices for terminals and devices)
//! - error (the workspace-wide error every crate converts into)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{RigError, RigResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
