//! Service configuration

use anyhow::{Context, Result};
use rolesync_core::RoleMapping;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// JSON role mapping file; the built-in mapping is used when unset
    #[serde(default)]
    pub role_map: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit JSON structured logs
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            role_map: None,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl ServiceConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the role mapping this configuration points at
    pub fn load_mapping(&self) -> Result<RoleMapping> {
        match &self.role_map {
            Some(path) => RoleMapping::from_file(path)
                .with_context(|| format!("Failed to load role mapping from {}", path.display())),
            None => Ok(RoleMapping::default()),
        }
    }
}
