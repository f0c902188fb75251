//! Error types for render_refs
//!
//! This module defines the errors returned by the slot table and the named
//! resource registry. Every error is returned synchronously to the caller;
//! nothing in this crate retries.

use std::fmt;
use crate::name::Name;

/// Result type for render_refs operations
pub type RefsResult<T> = std::result::Result<T, RefsError>;

/// render_refs errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefsError {
    /// Allocation requested while every slot of the table is occupied
    PoolExhausted {
        /// Fixed capacity of the exhausted table
        capacity: u32,
    },

    /// Handle index is out of range, its slot is free, or its generation
    /// does not match the slot's current generation
    StaleOrInvalidHandle {
        /// Slot index encoded in the rejected handle
        index: u32,
        /// Generation encoded in the rejected handle
        generation: u32,
    },

    /// Backend creation hook reported failure (slot and name were released)
    BackendCreateFailed {
        /// Name the resource was allocated under
        name: Name,
        /// Reason reported by the backend
        reason: String,
    },

    /// Name already associated with a live resource (reject policy)
    NameCollision(Name),

    /// Table capacity is zero or exceeds the addressable slot count
    InvalidCapacity(usize),

    /// Slot storage could not be reserved
    OutOfMemory,

    /// Resource lifecycle misuse (e.g. creating a resource twice)
    InvalidResource(String),

    /// Initialization failed (registry, backend subsystem)
    InitializationFailed(String),
}

impl fmt::Display for RefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefsError::PoolExhausted { capacity } => {
                write!(f, "Pool exhausted: all {} slots are in use", capacity)
            }
            RefsError::StaleOrInvalidHandle { index, generation } => {
                write!(f, "Stale or invalid handle (index {}, generation {})", index, generation)
            }
            RefsError::BackendCreateFailed { name, reason } => {
                write!(f, "Backend failed to create '{}': {}", name, reason)
            }
            RefsError::NameCollision(name) => write!(f, "Name collision: '{}' is already in use", name),
            RefsError::InvalidCapacity(capacity) => write!(f, "Invalid capacity: {}", capacity),
            RefsError::OutOfMemory => write!(f, "Out of memory"),
            RefsError::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            RefsError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for RefsError {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build a `RefsError::InvalidResource` from it
///
/// # Example
///
/// ```ignore
/// return Err(refs_err!("render_refs::Registry", "'{}' is already created", name));
/// ```
#[macro_export]
macro_rules! refs_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::refs_error!($source, "{}", message);
        $crate::refs::RefsError::InvalidResource(message)
    }};
}

/// Log an ERROR message and return early with `RefsError::InvalidResource`
///
/// # Example
///
/// ```ignore
/// refs_bail!("render_refs::Registry", "'{}' is already created", name);
/// ```
#[macro_export]
macro_rules! refs_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::refs_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
