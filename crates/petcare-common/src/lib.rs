//! Centralized directory and endpoint configuration for PetCare
//!
//! Directory layout:
//! ```text
//! petcare_data/
//! ├── session/         # Persisted identity and bearer token
//! └── logs/            # Rolling client logs
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "PETCARE_API_URL";

/// Environment variable overriding the data root.
pub const ROOT_ENV: &str = "PETCARE_ROOT";

/// Endpoint used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct PetcareConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Get the global configuration path
fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("petcare").join("config.json"))
}

/// Read a config file, treating a missing or unreadable file as empty.
pub fn load_config_from(path: &Path) -> PetcareConfig {
    if !path.exists() {
        return PetcareConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<PetcareConfig>(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse config file at {:?}: {}", path, e);
                PetcareConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read config file at {:?}: {}", path, e);
            PetcareConfig::default()
        }
    }
}

pub fn save_config_to(path: &Path, config: &PetcareConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load the persistent config from the user's config directory
pub fn load_config() -> PetcareConfig {
    match get_config_path() {
        Some(path) => load_config_from(&path),
        None => PetcareConfig::default(),
    }
}

/// Persist an API base URL so later runs pick it up without the env var
pub fn save_api_url(url: &str) -> anyhow::Result<()> {
    let path =
        get_config_path().ok_or_else(|| anyhow::anyhow!("Could not determine config dir"))?;
    let mut config = load_config_from(&path);
    config.api_url = Some(normalize_base_url(url));
    save_config_to(&path, &config)?;
    info!("Saved API URL to {:?}", path);
    Ok(())
}

/// Strip whitespace and trailing slashes so paths can be appended directly.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Pick the API base URL: environment first, then persisted config, then default.
pub fn resolve_api_url(env_value: Option<String>, persisted: Option<String>) -> String {
    env_value
        .filter(|v| !v.trim().is_empty())
        .or(persisted.filter(|v| !v.trim().is_empty()))
        .map(|v| normalize_base_url(&v))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// API base URL from `PETCARE_API_URL`, persistent config, or the local default
pub fn api_base_url() -> String {
    resolve_api_url(std::env::var(API_URL_ENV).ok(), load_config().api_url)
}

/// Get the data root from environment, persistent config, or default
pub fn petcare_root() -> PathBuf {
    if let Ok(val) = std::env::var(ROOT_ENV) {
        return PathBuf::from(val);
    }

    if let Some(root) = load_config().root {
        return root;
    }

    PathBuf::from("petcare_data")
}

/// Persisted session directory (identity and token files)
pub fn session_dir() -> PathBuf {
    petcare_root().join("session")
}

pub fn logs_dir() -> PathBuf {
    petcare_root().join("logs")
}

/// Ensure a single directory exists
pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        info!("Created directory: {:?}", path);
    }
    Ok(())
}

/// Initialize the directory structure. Call once at startup.
pub fn init_structure() -> anyhow::Result<PathBuf> {
    let root = petcare_root();
    ensure_dir(&root)?;
    ensure_dir(&session_dir())?;
    ensure_dir(&logs_dir())?;

    let canonical = fs::canonicalize(&root).unwrap_or_else(|_| root.clone());
    info!("PetCare directory structure initialized at: {:?}", canonical);
    Ok(canonical)
}
