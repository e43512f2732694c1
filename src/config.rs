use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fs::size::{SymlinkPolicy, UnitConvention};

// =============================================================================
// Lookup-related constants
// =============================================================================

/// Base URL of the iTunes lookup service
pub const DEFAULT_LOOKUP_BASE_URL: &str = "https://itunes.apple.com";

/// Timeout for a version lookup in milliseconds (30 seconds)
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 30_000;

/// User agent sent with every lookup request
pub const USER_AGENT: &str = "jkds-utility";

/// Name of the per-user documents folder used when the platform does not report one
const DOCUMENTS_FOLDER: &str = "Documents";

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UtilityConfig {
    pub files: FilesConfig,
    pub lookup: LookupConfig,
}

impl UtilityConfig {
    /// Loads a configuration from a JSON file. Missing fields use their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// File helper configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FilesConfig {
    /// Overrides the documents directory as the base of all relative paths
    pub base_dir: Option<PathBuf>,
    pub symlinks: SymlinkPolicy,
    pub units: UnitConvention,
}

impl FilesConfig {
    /// The configured base directory, or the platform documents directory.
    pub fn base_dir(&self) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(documents_dir)
    }
}

/// Store lookup configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupConfig {
    pub base_url: String,
    /// Request timeout in milliseconds; `None` waits indefinitely
    pub timeout_ms: Option<u64>,
}

impl LookupConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LOOKUP_BASE_URL.to_string(),
            timeout_ms: Some(DEFAULT_LOOKUP_TIMEOUT_MS),
        }
    }
}

/// Returns the user's documents directory.
/// Uses the platform documents directory if known,
/// otherwise falls back to ~/Documents,
/// or ./Documents if neither is available.
pub fn documents_dir() -> PathBuf {
    documents_dir_with(dirs::document_dir(), dirs::home_dir())
}

/// Returns the path to the data directory for jkds-utility.
/// Uses $XDG_DATA_HOME/jkds-utility if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/jkds-utility,
/// or ./jkds-utility if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("jkds-utility.log")
}

fn documents_dir_with(document_dir: Option<PathBuf>, home_dir: Option<PathBuf>) -> PathBuf {
    document_dir
        .or_else(|| home_dir.map(|home| home.join(DOCUMENTS_FOLDER)))
        .unwrap_or_else(|| PathBuf::from(".").join(DOCUMENTS_FOLDER))
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("jkds-utility")
}
