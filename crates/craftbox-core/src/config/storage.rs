//! Content store configuration.

use serde::{Deserialize, Serialize};

/// Top-level content storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Default content store provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Local filesystem content store configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            local: LocalStorageConfig::default(),
        }
    }
}

/// Local filesystem content store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for locally stored payloads.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_local_root() -> String {
    "./data/content".to_string()
}
