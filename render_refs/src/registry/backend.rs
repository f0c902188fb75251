/// Backend seam for resource kinds.
///
/// Every resource kind (texture, buffer, pipeline, sampler, ...) implements
/// [`ResourceBackend`] once: it names its description and backend-state types,
/// its default capacity and the hooks run when resources are created and
/// destroyed. The registry mechanism itself is shared by all kinds.

use std::fmt;
use crate::error::RefsResult;
use crate::name::Name;
use crate::pool::Ref;

/// Handle to a resource of kind `B`
pub type ResourceRef<B> = Ref<Resource<B>>;

/// Type-specific half of a resource registry
///
/// # Example
///
/// ```
/// use render_refs::refs::{Resource, ResourceBackend, ResourceRef, RefsResult};
///
/// #[derive(Default)]
/// struct SamplerDesc { anisotropy: u8 }
///
/// #[derive(Default)]
/// struct SamplerState { native: u64 }
///
/// struct Samplers { next_native: u64 }
///
/// impl ResourceBackend for Samplers {
///     type Desc = SamplerDesc;
///     type State = SamplerState;
///     const KIND: &'static str = "sampler";
///     const MAX_RESOURCES: usize = 64;
///
///     fn create(&mut self, _handle: ResourceRef<Self>, sampler: &mut Resource<Self>) -> RefsResult<()> {
///         self.next_native += 1;
///         sampler.backend.native = self.next_native;
///         Ok(())
///     }
///
///     fn destroy(&mut self, sampler: &mut Resource<Self>) {
///         sampler.backend.native = 0;
///     }
/// }
/// ```
pub trait ResourceBackend: Sized {
    /// Description supplied by the caller between `allocate_ref` and `create`
    type Desc: Default;

    /// State owned and populated by the backend
    type State: Default;

    /// Resource kind, used in log messages
    const KIND: &'static str;

    /// Default table capacity for this kind
    const MAX_RESOURCES: usize;

    /// Called once when the registry is initialized
    fn init(&mut self) -> RefsResult<()> {
        Ok(())
    }

    /// Called once when the registry is deinitialized
    fn deinit(&mut self) {}

    /// Populate backend state for a freshly allocated resource
    ///
    /// An error makes the registry roll the allocation back.
    fn create(&mut self, handle: ResourceRef<Self>, resource: &mut Resource<Self>) -> RefsResult<()>;

    /// Release backend state. Only called for resources whose `create` succeeded.
    fn destroy(&mut self, resource: &mut Resource<Self>);
}

/// Record stored in a registry slot
pub struct Resource<B: ResourceBackend> {
    name: Name,
    created: bool,
    /// Caller-supplied description
    pub desc: B::Desc,
    /// Backend-owned state
    pub backend: B::State,
}

impl<B: ResourceBackend> Resource<B> {
    /// Name the resource was allocated under
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Whether the backend create hook has completed for this resource
    pub fn is_created(&self) -> bool {
        self.created
    }

    pub(crate) fn set_name(&mut self, name: Name) {
        self.name = name;
    }

    pub(crate) fn set_created(&mut self, created: bool) {
        self.created = created;
    }
}

impl<B: ResourceBackend> Default for Resource<B> {
    fn default() -> Self {
        Self {
            name: Name::default(),
            created: false,
            desc: B::Desc::default(),
            backend: B::State::default(),
        }
    }
}

impl<B> fmt::Debug for Resource<B>
where
    B: ResourceBackend,
    B::Desc: fmt::Debug,
    B::State: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &B::KIND)
            .field("name", &self.name)
            .field("created", &self.created)
            .field("desc", &self.desc)
            .field("backend", &self.backend)
            .finish()
    }
}
