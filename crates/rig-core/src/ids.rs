//! Arena indices for terminals and devices.
//!
//! Ids are handed out once when the registry is built and never reused, so a
//! solver can address per-terminal vectors by [`Id::slot`] directly.

use core::fmt;
use core::num::NonZeroU32;

/// Stable 0-based arena index, stored as `index + 1` so `Option<Id>` costs
/// nothing extra.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// From a vector position. Arenas here never approach `u32::MAX`.
    pub fn from_slot(slot: usize) -> Self {
        Self::from_index(u32::try_from(slot).unwrap_or(u32::MAX - 1))
    }

    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// The 0-based index as a `usize`, for slice addressing.
    pub fn slot(self) -> usize {
        self.index() as usize
    }

    /// Every id of an arena of `len` entries, in order.
    pub fn all(len: usize) -> impl Iterator<Item = Id> {
        (0..len).map(Id::from_slot)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

pub type TerminalIdx = Id;
pub type DeviceIdx = Id;
