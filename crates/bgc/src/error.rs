//! Error Module - BGC Error Types
//!
//! Defines all error types used by the object core.
//!
//! # Error Categories
//!
//! ## Allocation Errors
//! - `OutOfMemory` - Heap limit reached or slot table could not grow
//!
//! ## Handle Errors
//! - `StaleHandle` - Handle refers to an object that was already released
//! - `TypeMismatch` - Typed access with the wrong concrete type
//!
//! ## Collector Errors
//! - `InvalidState` - Idle invariant violated (stale mark bits)
//! - `UnknownRoot` - Root id not registered
//!
//! ## Configuration Errors
//! - `Configuration` - Invalid configuration

use crate::config::ConfigError;
use crate::object::Handle;
use thiserror::Error;

/// Main error type for all BGC operations
///
/// # Examples
///
/// ```rust
/// use bgc::BgcError;
///
/// fn handle_error(err: BgcError) {
///     match err {
///         BgcError::OutOfMemory { requested, available } => {
///             eprintln!("OOM: requested {}, available {}", requested, available);
///         }
///         BgcError::StaleHandle { index, generation } => {
///             eprintln!("object #{}.{} was reclaimed", index, generation);
///         }
///         _ => eprintln!("Other error: {}", err),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum BgcError {
    /// Out of memory
    ///
    /// **When returned:** The allocation would push live bytes past
    /// `max_heap_size`, or the live-set table could not grow.
    ///
    /// **Recovery strategy:** Collect and retry, or fail the construction.
    /// The heap never retries on its own.
    #[error("Out of memory: requested {requested} bytes, available {available} bytes")]
    OutOfMemory { requested: usize, available: usize },

    /// Handle points at a released slot
    ///
    /// **When returned:** Any heap access through a handle whose object was
    /// reclaimed. Usually a root the interpreter forgot to report.
    #[error("Stale handle #{index}.{generation}: object was reclaimed")]
    StaleHandle { index: u32, generation: u32 },

    /// Typed access with the wrong concrete type
    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Root id not present in the root registry
    #[error("Unknown root id {0}")]
    UnknownRoot(usize),

    /// Invalid state
    ///
    /// **When returned:** Collector found the heap outside the idle
    /// invariant (mark bits left set).
    ///
    /// **Recovery strategy:** Cannot recover - indicates bug
    #[error("Invalid state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl BgcError {
    /// Build a stale-handle error for `handle`
    pub fn stale(handle: Handle) -> Self {
        BgcError::StaleHandle {
            index: handle.index(),
            generation: handle.generation(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BgcError::OutOfMemory { .. })
    }

    /// Check if this error indicates a bug in the caller or in BGC
    pub fn is_bug(&self) -> bool {
        matches!(
            self,
            BgcError::StaleHandle { .. }
                | BgcError::TypeMismatch { .. }
                | BgcError::InvalidState { .. }
        )
    }
}

impl From<ConfigError> for BgcError {
    fn from(err: ConfigError) -> Self {
        BgcError::Configuration(err.to_string())
    }
}

/// Result type alias for BGC operations
pub type Result<T> = std::result::Result<T, BgcError>;
