//! Configuration loaded from `qail-geo.toml`.
//!
//! Looked up in the working directory first, then in the user config
//! directory (`~/.config/qail-geo/qail-geo.toml` on Linux). Missing files
//! mean defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::elements::DEFAULT_SRID;
use crate::error::{GeoError, GeoResult};
use crate::transpiler::DialectKind;

pub const CONFIG_FILE_NAME: &str = "qail-geo.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Database connection URL
    pub database_url: Option<String>,

    /// Placeholder style used when printing compiled SQL
    pub dialect: DialectKind,

    /// SRID given to plain elements built by the CLI
    pub default_srid: i32,

    /// Pool size for the execution engine
    pub max_connections: u32,

    /// tracing filter directive, e.g. "qail_geo=debug"
    pub log_filter: Option<String>,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            dialect: DialectKind::Named,
            default_srid: DEFAULT_SRID,
            max_connections: 5,
            log_filter: None,
        }
    }
}

impl GeoConfig {
    /// Load the first config file found, or defaults if there is none.
    pub fn load() -> GeoResult<Self> {
        match Self::locate() {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> GeoResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| GeoError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> GeoResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Candidate config paths, in lookup order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("qail-geo").join(CONFIG_FILE_NAME));
        }
        paths
    }

    fn locate() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|path| path.exists())
    }
}
