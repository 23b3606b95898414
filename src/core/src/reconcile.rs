//! Role reconciliation
//!
//! Diffs the roles a caller asks for against the roles stored for the user
//! and replaces the stored set with the requested one.

use crate::error::{Result, RoleSyncError};
use crate::mapping::RoleMapping;
use crate::store::RoleStore;
use crate::{RoleCode, RoleSet, UserId};
use std::sync::Arc;
use tracing::info;

/// Outcome of a reconciliation, in internal role codes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDiff {
    /// Requested but not previously stored
    pub added: Vec<RoleCode>,
    /// Previously stored but no longer requested
    pub deleted: Vec<RoleCode>,
    /// Requested and already stored
    pub unchanged: Vec<RoleCode>,
}

impl RoleDiff {
    /// Compare the previous and desired sets
    pub fn between(previous: &RoleSet, desired: &RoleSet) -> Self {
        Self {
            added: desired.difference(previous).cloned().collect(),
            deleted: previous.difference(desired).cloned().collect(),
            unchanged: desired.intersection(previous).cloned().collect(),
        }
    }

    /// True when the stored roles were already the desired ones
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Applies role updates to a [`RoleStore`]
pub struct Reconciler {
    mapping: Arc<RoleMapping>,
    store: Arc<dyn RoleStore>,
}

impl Reconciler {
    pub fn new(mapping: Arc<RoleMapping>, store: Arc<dyn RoleStore>) -> Self {
        Self { mapping, store }
    }

    pub fn mapping(&self) -> &Arc<RoleMapping> {
        &self.mapping
    }

    pub fn store(&self) -> &Arc<dyn RoleStore> {
        &self.store
    }

    /// Translate external role names into a deduplicated set of codes.
    ///
    /// Fails on the first name the mapping does not know.
    pub fn desired_roles<S: AsRef<str>>(&self, names: &[S]) -> Result<RoleSet> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.mapping
                    .code_for(name)
                    .cloned()
                    .ok_or_else(|| RoleSyncError::UnknownRole(name.to_string()))
            })
            .collect()
    }

    /// Make `names` the user's complete role list and report what changed.
    ///
    /// Nothing is written unless every name maps to a code. The store swap is
    /// a single atomic operation, so concurrent updates for the same user
    /// cannot interleave.
    pub async fn reconcile<S: AsRef<str>>(&self, user_id: &str, names: &[S]) -> Result<RoleDiff> {
        let desired = self.desired_roles(names)?;
        let previous = self.store.swap(user_id, desired.clone()).await?;
        let diff = RoleDiff::between(&previous, &desired);

        info!(
            user_id = %user_id,
            added = diff.added.len(),
            deleted = diff.deleted.len(),
            unchanged = diff.unchanged.len(),
            "roles reconciled"
        );

        Ok(diff)
    }

    /// Current roles of a user
    pub async fn roles_of(&self, user_id: &str) -> Result<RoleSet> {
        self.store.roles(user_id).await
    }

    /// Every user id the store has seen
    pub async fn known_users(&self) -> Result<Vec<UserId>> {
        self.store.user_ids().await
    }
}
