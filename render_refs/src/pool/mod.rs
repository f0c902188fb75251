//! Generation-checked slot storage
//!
//! [`RefArray`] is the fixed-capacity slot table; [`Ref`] is the typed handle
//! it hands out.

mod handle;
mod ref_array;

pub use handle::Ref;
pub use ref_array::{RefArray, MAX_CAPACITY};
