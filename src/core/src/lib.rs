//! # Role Sync Core
//!
//! Reconciles a user's externally supplied Azure AD role names against the
//! internal role codes tracked for that user.
//!
//! - [`mapping`]: static table from external role name to internal code
//! - [`store`]: per-user role sets behind the [`RoleStore`] trait
//! - [`validation`]: request payload checks, all violations reported at once
//! - [`reconcile`]: the added / deleted / unchanged diff and store update

pub mod error;
pub mod mapping;
pub mod reconcile;
pub mod store;
pub mod validation;

pub use error::{Result, RoleSyncError};
pub use mapping::RoleMapping;
pub use reconcile::{Reconciler, RoleDiff};
pub use store::{InMemoryRoleStore, RoleStore};
pub use validation::{ErrorKind, FieldError, RoleUpdate};

use std::collections::BTreeSet;

/// User identifier as sent by the caller (after sanitising)
pub type UserId = String;

/// Canonical internal role code, e.g. `BC_ADMIN`
pub type RoleCode = String;

/// Set of internal role codes; ordered so responses are deterministic
pub type RoleSet = BTreeSet<RoleCode>;
