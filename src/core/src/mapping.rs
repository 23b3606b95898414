//! External role name to internal role code mapping

use crate::error::{Result, RoleSyncError};
use crate::RoleCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Read-only table translating Azure AD role names into internal role codes.
///
/// Built once at startup and shared between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleMapping {
    entries: HashMap<String, RoleCode>,
}

impl RoleMapping {
    /// Build a mapping from `(external name, internal code)` pairs.
    ///
    /// Fails on an empty table or on empty names/codes.
    pub fn new<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RoleCode>,
    {
        let mapping = Self {
            entries: entries
                .into_iter()
                .map(|(name, code)| (name.into(), code.into()))
                .collect(),
        };
        mapping.check()?;
        Ok(mapping)
    }

    /// Parse a JSON object of the form `{"<external name>": "<code>"}`
    pub fn from_json(json: &str) -> Result<Self> {
        let mapping: RoleMapping = serde_json::from_str(json)
            .map_err(|e| RoleSyncError::invalid_mapping(e.to_string()))?;
        mapping.check()?;
        Ok(mapping)
    }

    /// Load a JSON mapping file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    fn check(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(RoleSyncError::invalid_mapping("mapping has no entries"));
        }
        if let Some((name, _)) = self
            .entries
            .iter()
            .find(|(name, code)| name.is_empty() || code.is_empty())
        {
            return Err(RoleSyncError::invalid_mapping(format!(
                "empty role name or code in entry {:?}",
                name
            )));
        }
        Ok(())
    }

    /// Internal code for an external role name
    pub fn code_for(&self, name: &str) -> Option<&RoleCode> {
        self.entries.get(name)
    }

    /// Whether the external role name is known
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether `code` is in the mapping's value range
    pub fn is_known_code(&self, code: &str) -> bool {
        self.entries.values().any(|c| c == code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RoleMapping {
    /// The three Azure AD roles known to the business-central integration
    fn default() -> Self {
        Self {
            entries: HashMap::from([
                ("001 - Admin".to_string(), "BC_ADMIN".to_string()),
                (
                    "002 - Clinical Personnel".to_string(),
                    "BC_CLINICAL".to_string(),
                ),
                (
                    "003 - Warehouse Personnel".to_string(),
                    "BC_WAREHOUSE".to_string(),
                ),
            ]),
        }
    }
}
