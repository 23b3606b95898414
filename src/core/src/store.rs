//! User role storage

use crate::error::Result;
use crate::{RoleSet, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage backend for the role codes assigned to each user
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Roles currently assigned to a user (empty for unknown users)
    async fn roles(&self, user_id: &str) -> Result<RoleSet>;

    /// Replace a user's roles and return the previous set.
    ///
    /// The read of the old set and the write of the new one must be atomic
    /// with respect to other calls for the same user.
    async fn swap(&self, user_id: &str, roles: RoleSet) -> Result<RoleSet>;

    /// All user ids seen so far
    async fn user_ids(&self) -> Result<Vec<UserId>>;
}

/// In-memory role store; contents are lost on restart
pub struct InMemoryRoleStore {
    users: Arc<RwLock<HashMap<UserId, RoleSet>>>,
}

impl InMemoryRoleStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryRoleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn roles(&self, user_id: &str) -> Result<RoleSet> {
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned().unwrap_or_default())
    }

    async fn swap(&self, user_id: &str, roles: RoleSet) -> Result<RoleSet> {
        let mut users = self.users.write().await;
        Ok(users
            .insert(user_id.to_string(), roles)
            .unwrap_or_default())
    }

    async fn user_ids(&self) -> Result<Vec<UserId>> {
        let users = self.users.read().await;
        let mut ids: Vec<UserId> = users.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
