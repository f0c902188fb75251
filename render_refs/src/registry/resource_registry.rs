/// Named resource registry.
///
/// Composes a [`RefArray`] with a name index and a [`ResourceBackend`] to give
/// every resource kind the same lifecycle:
///
/// ```text
/// allocate_ref(name) -> create(ref) -> get / get_mut ... -> destroy(ref)
/// ```
///
/// The registry is a plain owned value with no internal locking. Share it
/// across threads by wrapping it in a `Mutex`.

use rustc_hash::FxHashMap;
use crate::error::{RefsError, RefsResult};
use crate::name::Name;
use crate::pool::{Ref, RefArray};
use crate::{refs_bail, refs_debug, refs_info, refs_trace, refs_warn};
use super::backend::{Resource, ResourceBackend, ResourceRef};

const SOURCE: &str = "render_refs::Registry";

/// What `allocate_ref` does when the name is already in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// Fail with `RefsError::NameCollision`
    #[default]
    Reject,

    /// Allow duplicates; `find_by_name` returns the most recent live one
    Shadow,
}

/// Registry configuration
#[derive(Debug, Clone, Default)]
pub struct RegistryDesc {
    /// Label used in log messages (defaults to `ResourceBackend::KIND`)
    pub label: String,
    /// Slot count (defaults to `ResourceBackend::MAX_RESOURCES`)
    pub capacity: Option<usize>,
    /// Name collision policy
    pub name_policy: NamePolicy,
}

impl RegistryDesc {
    /// Default configuration with an explicit capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }
}

/// Slot table + name index + backend hooks for one resource kind
pub struct ResourceRegistry<B: ResourceBackend> {
    desc: RegistryDesc,
    refs: RefArray<Resource<B>>,
    /// Live handles per name, oldest first
    names: FxHashMap<Name, Vec<ResourceRef<B>>>,
    backend: B,
}

impl<B: ResourceBackend> ResourceRegistry<B> {
    /// Build the slot table and initialize the backend
    ///
    /// # Errors
    ///
    /// - `RefsError::InvalidCapacity` / `RefsError::OutOfMemory` from the slot table
    /// - `RefsError::InitializationFailed` if the backend init hook fails
    pub fn init(mut backend: B, mut desc: RegistryDesc) -> RefsResult<Self> {
        if desc.label.is_empty() {
            desc.label = B::KIND.to_string();
        }
        let capacity = desc.capacity.unwrap_or(B::MAX_RESOURCES);
        let refs = RefArray::new(capacity)?;

        backend.init().map_err(|err| match err {
            RefsError::InitializationFailed(_) => err,
            other => RefsError::InitializationFailed(format!("{} backend: {}", desc.label, other)),
        })?;

        refs_info!(SOURCE, "'{}' registry initialized ({} slots)", desc.label, capacity);

        Ok(Self {
            desc,
            refs,
            names: FxHashMap::default(),
            backend,
        })
    }

    /// Initialize with the backend's default configuration
    pub fn init_default(backend: B) -> RefsResult<Self> {
        Self::init(backend, RegistryDesc::default())
    }

    /// Deinitialize the backend and release the slot table
    ///
    /// Live resources are not torn down; call [`destroy_all`](Self::destroy_all)
    /// first if the backend owns anything that needs releasing. Returns the
    /// backend.
    pub fn deinit(self) -> B {
        let Self { desc, refs, mut backend, .. } = self;

        backend.deinit();

        let leaked = refs.destroy();
        if leaked > 0 {
            refs_warn!(SOURCE, "'{}' registry deinitialized with {} live resources", desc.label, leaked);
        } else {
            refs_info!(SOURCE, "'{}' registry deinitialized", desc.label);
        }

        backend
    }

    /// Reserve a slot for a resource called `name`
    ///
    /// The resource is reachable by handle and by name from here on, but its
    /// backend state is not populated until [`create`](Self::create).
    ///
    /// # Errors
    ///
    /// - `RefsError::NameCollision` if the name is live and the policy is `Reject`
    /// - `RefsError::PoolExhausted` if every slot is in use
    pub fn allocate_ref(&mut self, name: impl Into<Name>) -> RefsResult<ResourceRef<B>> {
        let name = name.into();

        if self.desc.name_policy == NamePolicy::Reject && self.names.contains_key(&name) {
            return Err(RefsError::NameCollision(name));
        }

        let handle = self.refs.allocate()?;
        self.refs.get_mut(handle)?.set_name(name.clone());

        refs_trace!(SOURCE, "'{}': allocated '{}' at {:?}", self.desc.label, name, handle);
        self.names.entry(name).or_default().push(handle);

        Ok(handle)
    }

    /// Run the backend create hook for an allocated resource
    ///
    /// On hook failure the allocation is rolled back: the name entry is
    /// removed and the slot freed, so the handle becomes stale.
    ///
    /// # Errors
    ///
    /// - `RefsError::StaleOrInvalidHandle` if the handle is not live
    /// - `RefsError::InvalidResource` if the resource was already created
    /// - `RefsError::BackendCreateFailed` if the hook failed
    pub fn create(&mut self, handle: ResourceRef<B>) -> RefsResult<()> {
        let resource = self.refs.get_mut(handle)?;
        if resource.is_created() {
            refs_bail!(SOURCE, "'{}': '{}' is already created", self.desc.label, resource.name());
        }

        match self.backend.create(handle, resource) {
            Ok(()) => {
                resource.set_created(true);
                Ok(())
            }
            Err(err) => {
                let name = resource.name().clone();
                self.unindex(&name, handle);
                self.refs.free(handle)?;

                refs_debug!(SOURCE, "'{}': create of '{}' failed, rolled back: {}", self.desc.label, name, err);
                Err(RefsError::BackendCreateFailed {
                    name,
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Allocate and create in one step
    pub fn allocate_and_create(
        &mut self,
        name: impl Into<Name>,
        desc: B::Desc,
    ) -> RefsResult<ResourceRef<B>> {
        let handle = self.allocate_ref(name)?;
        self.refs.get_mut(handle)?.desc = desc;
        self.create(handle)?;
        Ok(handle)
    }

    /// Borrow a live resource
    pub fn get(&self, handle: ResourceRef<B>) -> RefsResult<&Resource<B>> {
        self.refs.get(handle)
    }

    /// Mutably borrow a live resource
    pub fn get_mut(&mut self, handle: ResourceRef<B>) -> RefsResult<&mut Resource<B>> {
        self.refs.get_mut(handle)
    }

    /// Tear a resource down and release its slot
    ///
    /// The backend destroy hook runs first, while the resource is still
    /// reachable; the name entry and the slot are released afterwards.
    ///
    /// # Errors
    ///
    /// `RefsError::StaleOrInvalidHandle` if the handle is not live (including a
    /// second destroy).
    pub fn destroy(&mut self, handle: ResourceRef<B>) -> RefsResult<()> {
        let resource = self.refs.get_mut(handle)?;
        if resource.is_created() {
            self.backend.destroy(resource);
            resource.set_created(false);
        }

        let name = resource.name().clone();
        self.unindex(&name, handle);
        self.refs.free(handle)?;

        refs_trace!(SOURCE, "'{}': destroyed '{}' at {:?}", self.desc.label, name, handle);
        Ok(())
    }

    /// Destroy every live resource in index order, returning how many there were
    pub fn destroy_all(&mut self) -> usize {
        let handles = self.refs.handles();
        let count = handles.len();
        for handle in handles {
            // Handles were collected from live slots just above
            let _ = self.destroy(handle);
        }
        if count > 0 {
            refs_debug!(SOURCE, "'{}': destroyed {} resources", self.desc.label, count);
        }
        count
    }

    /// Handle registered under `name`, or `Ref::INVALID`
    ///
    /// Under `NamePolicy::Shadow` the most recently allocated live handle wins.
    pub fn find_by_name(&self, name: &Name) -> ResourceRef<B> {
        self.names
            .get(name)
            .and_then(|handles| handles.last().copied())
            .unwrap_or(Ref::INVALID)
    }

    /// [`find_by_name`](Self::find_by_name) for a string slice
    pub fn find(&self, name: &str) -> ResourceRef<B> {
        self.find_by_name(&Name::new(name))
    }

    /// Whether `handle` refers to a live resource
    pub fn contains(&self, handle: ResourceRef<B>) -> bool {
        self.refs.is_valid(handle)
    }

    /// Name of a live resource
    pub fn name_of(&self, handle: ResourceRef<B>) -> RefsResult<&Name> {
        self.refs.get(handle).map(Resource::name)
    }

    /// Iterate over live resources in index order
    pub fn iter(&self) -> impl Iterator<Item = (ResourceRef<B>, &Resource<B>)> + '_ {
        self.refs.iter()
    }

    /// Number of live resources
    pub fn len(&self) -> usize {
        self.refs.len() as usize
    }

    /// Whether no resource is live
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Fixed slot count
    pub fn capacity(&self) -> usize {
        self.refs.capacity() as usize
    }

    /// Underlying slot table (read-only)
    pub fn ref_array(&self) -> &RefArray<Resource<B>> {
        &self.refs
    }

    /// Configuration the registry was initialized with
    pub fn desc(&self) -> &RegistryDesc {
        &self.desc
    }

    /// Backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Backend (mutable)
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn unindex(&mut self, name: &Name, handle: ResourceRef<B>) {
        if let Some(handles) = self.names.get_mut(name) {
            handles.retain(|h| *h != handle);
            if handles.is_empty() {
                self.names.remove(name);
            }
        }
    }
}

#[cfg(test)]
#[path = "resource_registry_tests.rs"]
mod tests;
