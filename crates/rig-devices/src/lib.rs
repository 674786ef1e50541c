//! rig-devices: device library for the training rig.
//!
//! Every device is one variant of the closed [`DeviceKind`] enum. Variants
//! expose only the capabilities their role needs:
//! - [`ElectricalNode`]: wire terminal roles and the bridging predicate
//! - [`PneumaticNode`]: pipe port roles and the pressure transform
//!
//! The [`Device`] wrapper adds the contract consumed by the update cycle:
//! `value`, `set_value`, `set_power` and `update`.
//!
//! # Example
//!
//! ```
//! use rig_core::units::{bar, in_bar};
//! use rig_devices::{PneumaticNode, Regulator};
//!
//! let reg = Regulator::new(bar(5.0));
//! let out = reg.transform("i", bar(50.0));
//! assert_eq!(out.len(), 1);
//! assert_eq!(out[0].0, "o");
//! assert!((in_bar(out[0].1) - 5.0).abs() < 1e-9);
//! ```

pub mod device;
pub mod error;
pub mod gauge;
pub mod load;
pub mod meter;
pub mod regulator;
pub mod reservoir;
pub mod sensor;
pub mod source;
pub mod switch;
pub mod tee;
pub mod traits;
pub mod valve;

// Re-exports
pub use device::{Device, DeviceKind, build_registry};
pub use error::{DeviceError, DeviceResult};
pub use gauge::Gauge;
pub use load::Load;
pub use meter::{Ammeter, MeterMode, Multimeter};
pub use regulator::Regulator;
pub use reservoir::Reservoir;
pub use sensor::Sensor;
pub use source::Source;
pub use switch::Switch;
pub use tee::Tee;
pub use traits::{ElectricalNode, PneumaticNode, PortOutputs};
pub use valve::Valve;
