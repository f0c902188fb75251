/// Mock backend for unit tests (no GPU required)
///
/// Records every hook call so tests can check ordering, and can be told to
/// fail `init` or the creation of specific names.

use rustc_hash::FxHashSet;
use crate::error::{RefsError, RefsResult};
use super::backend::{Resource, ResourceBackend, ResourceRef};

/// Hook invocation recorded by [`MockBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Init,
    Deinit,
    Create(String),
    Destroy(String),
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MockTextureDesc {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MockTextureState {
    /// Fake native object id, 0 while not created
    pub native: u64,
}

#[derive(Debug, Default)]
pub struct MockBackend {
    pub calls: Vec<MockCall>,
    pub fail_init: bool,
    pub fail_names: FxHashSet<String>,
    /// Number of native objects currently alive
    pub alive: usize,
    next_native: u64,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(names: &[&str]) -> Self {
        Self {
            fail_names: names.iter().map(|name| name.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }
}

impl ResourceBackend for MockBackend {
    type Desc = MockTextureDesc;
    type State = MockTextureState;

    const KIND: &'static str = "mock_texture";
    const MAX_RESOURCES: usize = 8;

    fn init(&mut self) -> RefsResult<()> {
        self.calls.push(MockCall::Init);
        if self.fail_init {
            return Err(RefsError::InvalidResource("mock init failure".to_string()));
        }
        Ok(())
    }

    fn deinit(&mut self) {
        self.calls.push(MockCall::Deinit);
    }

    fn create(&mut self, handle: ResourceRef<Self>, resource: &mut Resource<Self>) -> RefsResult<()> {
        let name = resource.name().to_string();
        self.calls.push(MockCall::Create(name.clone()));
        assert!(handle.is_valid());

        if self.fail_names.contains(&name) {
            return Err(RefsError::InvalidResource(format!("mock refused '{}'", name)));
        }

        self.next_native += 1;
        resource.backend.native = self.next_native;
        self.alive += 1;
        Ok(())
    }

    fn destroy(&mut self, resource: &mut Resource<Self>) {
        self.calls.push(MockCall::Destroy(resource.name().to_string()));
        resource.backend.native = 0;
        self.alive -= 1;
    }
}
