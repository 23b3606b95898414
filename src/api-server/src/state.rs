use rolesync_core::{InMemoryRoleStore, Reconciler, RoleMapping, RoleStore};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Role reconciler, owning the mapping and the user role store
    pub reconciler: Arc<Reconciler>,

    /// Application version
    pub version: String,
}

impl AppState {
    pub fn new(mapping: RoleMapping, store: Arc<dyn RoleStore>) -> Self {
        Self {
            reconciler: Arc::new(Reconciler::new(Arc::new(mapping), store)),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(mapping: RoleMapping) -> Self {
        Self::new(mapping, Arc::new(InMemoryRoleStore::new()))
    }

    pub fn mapping(&self) -> &RoleMapping {
        self.reconciler.mapping()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory(RoleMapping::default())
    }
}
