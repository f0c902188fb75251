/*!
# render_refs

Generation-checked handle pools and named resource registries for renderer
resource types.

Every resource kind of a renderer (pipelines, buffers, textures, samplers, ...)
needs the same bookkeeping: a fixed number of slots, handles that detect use
after free, and lookup by name. This crate implements that once, generic over
the record type, and lets each kind plug in its backend hooks.

## Architecture

- **Ref**: typed (index, generation) handle packed in a `u64`
- **RefArray**: fixed-capacity slot table with a LIFO free-list
- **ResourceRegistry**: RefArray + name index + backend create/destroy hooks
- **ResourceBackend**: trait implemented once per resource kind

```
use render_refs::refs::{Resource, ResourceBackend, ResourceRef, ResourceRegistry, RegistryDesc, RefsResult};

#[derive(Default)]
struct BufferDesc { size: u64 }

#[derive(Default)]
struct BufferState { mapped: bool }

struct Buffers;

impl ResourceBackend for Buffers {
    type Desc = BufferDesc;
    type State = BufferState;
    const KIND: &'static str = "buffer";
    const MAX_RESOURCES: usize = 2;

    fn create(&mut self, _handle: ResourceRef<Self>, buffer: &mut Resource<Self>) -> RefsResult<()> {
        buffer.backend.mapped = buffer.desc.size > 0;
        Ok(())
    }

    fn destroy(&mut self, buffer: &mut Resource<Self>) {
        buffer.backend.mapped = false;
    }
}

let mut buffers = ResourceRegistry::init(Buffers, RegistryDesc::default())?;
let vertices = buffers.allocate_ref("vertices")?;
buffers.get_mut(vertices)?.desc.size = 1024;
buffers.create(vertices)?;
assert_eq!(buffers.find("vertices"), vertices);

buffers.destroy(vertices)?;
assert!(buffers.get(vertices).is_err());
assert!(!buffers.find("vertices").is_valid());
buffers.deinit();
# Ok::<(), render_refs::refs::RefsError>(())
```
*/

// Internal modules
mod error;
mod name;
pub mod log;
pub mod pool;
pub mod registry;

// Main namespace module
pub mod refs {
    // Error types
    pub use crate::error::{RefsError, RefsResult};

    // Names
    pub use crate::name::Name;

    // Slot table and handles
    pub use crate::pool::{Ref, RefArray, MAX_CAPACITY};

    // Registries
    pub use crate::registry::{
        NamePolicy, RegistryDesc, Resource, ResourceBackend, ResourceRef, ResourceRegistry,
    };

    // Logging sub-module (types and configuration, NOT macros)
    pub mod log {
        pub use crate::log::{
            DefaultLogger, LogEntry, LogSeverity, Logger,
            enabled, log, log_detailed,
            min_severity, reset_logger, set_logger, set_min_severity,
        };
    }
}
