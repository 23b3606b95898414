//! Error types for role synchronisation
//!
//! Validation failures are not errors in this sense: they are collected as
//! [`crate::validation::FieldError`] values and reported together.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RoleSyncError>;

/// Role synchronisation error
#[derive(Debug, Error)]
pub enum RoleSyncError {
    /// External role name with no entry in the role mapping
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Role mapping definition rejected at load time
    #[error("Invalid role mapping: {0}")]
    InvalidMapping(String),

    /// User role store failure
    #[error("Store error: {0}")]
    Store(String),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RoleSyncError {
    /// Create an invalid mapping error
    pub fn invalid_mapping<S: Into<String>>(msg: S) -> Self {
        RoleSyncError::InvalidMapping(msg.into())
    }

    /// Create a store error
    pub fn store<S: Into<String>>(msg: S) -> Self {
        RoleSyncError::Store(msg.into())
    }
}
