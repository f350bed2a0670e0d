// ABOUTME: Application configuration loaded from config.toml with defaults for every field
// Covers the workspace root, the session state file, search file conventions and known connections

use crate::models::Connection;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCRATCH_DIR: &str = ".dockit";
pub const DEFAULT_EXTENSION: &str = "search";
pub const DEFAULT_CODE_SNIPPET: &str = r#"// Welcome to DocKit search
GET _search
{
  "query": {
    "match_all": {}
  }
}
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory relative panel files resolve against
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,

    /// JSON file holding the persisted session snapshot
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Answer given when a save needs the user to pick a folder
    #[serde(default)]
    pub default_folder: Option<PathBuf>,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Conventions of the search-file persistence protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: String,

    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default = "default_snippet")]
    pub default_snippet: String,
}

fn default_workspace_root() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join("dockit"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_state_file() -> PathBuf {
    AppConfig::data_dir().join("session.json")
}

fn default_scratch_dir() -> String {
    DEFAULT_SCRATCH_DIR.to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_snippet() -> String {
    DEFAULT_CODE_SNIPPET.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            extension: default_extension(),
            default_snippet: default_snippet(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace_root: default_workspace_root(),
            state_file: default_state_file(),
            default_folder: None,
            session: SessionConfig::default(),
            connections: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not find config directory")?;
        Ok(config_dir.join("dockit").join("config.toml"))
    }

    /// Where logs and session state live.
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|dir| dir.join("dockit"))
            .unwrap_or_else(|| PathBuf::from(".dockit-data"))
    }
}
