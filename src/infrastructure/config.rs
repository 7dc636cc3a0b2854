//! Runtime configuration loaded from a JSON file.

use crate::domain::{Catalog, ThemeVariant};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "TPOS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "tpos.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PosConfig {
    pub store_name: String,
    /// `None` keeps all data in memory.
    pub storage_path: Option<PathBuf>,
    pub log_path: PathBuf,
    pub receipt_dir: PathBuf,
    /// Theme loaded right after startup; the evolution theme when unset.
    pub theme: Option<ThemeVariant>,
    pub catalog: Catalog,
}

impl Default for PosConfig {
    fn default() -> Self {
        Self {
            store_name: "tpos".to_string(),
            storage_path: Some(PathBuf::from("tpos-data.json")),
            log_path: PathBuf::from("tpos.log"),
            receipt_dir: PathBuf::from("."),
            theme: None,
            catalog: Catalog::demo(),
        }
    }
}

impl PosConfig {
    /// Loads from `$TPOS_CONFIG`, falling back to `tpos.json`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load(&path)
    }

    /// A missing file yields the defaults; anything unreadable is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
