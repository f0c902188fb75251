//! Named resource registries
//!
//! One generic registry shared by every resource kind. A kind plugs in by
//! implementing [`ResourceBackend`].

mod backend;
mod resource_registry;
#[cfg(test)]
pub(crate) mod mock_backend;

pub use backend::{Resource, ResourceBackend, ResourceRef};
pub use resource_registry::{NamePolicy, RegistryDesc, ResourceRegistry};
