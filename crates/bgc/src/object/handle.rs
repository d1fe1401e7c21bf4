//! Object Handle - Generation-checked references into the live set
//!
//! Handle Layout (8 bytes):
//! ┌──────────────────────┬──────────────────────┐
//! │   Slot index (u32)   │   Generation (u32)   │
//! └──────────────────────┴──────────────────────┘
//!
//! A slot's generation is bumped every time its object is released, so a
//! handle that outlives its object never resolves to whatever object
//! reuses the slot afterwards.

use std::fmt;

/// Copyable reference to a heap object
///
/// Handles are the only way to refer to heap objects. Two handles are equal
/// exactly when they name the same allocation, which makes handle equality
/// the identity test of the object model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the live set
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}
