//! YAML configuration.
//!
//! One file configures every stage. Every section has defaults so a partial
//! file loads cleanly.
//!
//! # API pattern
//!
//! Loading functions have two forms:
//! - `fn_at(path, …)` — explicit path; used in tests with `TempDir`
//! - `fn(…)` — derives the path from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Version discovery: two storefront pages plus the login-style endpoint
/// that answers the resource version in a response header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    /// Primary storefront page, scraped for the client version.
    pub primary_store_url: String,
    /// Fallback storefront page, tried only when the primary yields nothing.
    pub secondary_store_url: String,
    /// Login endpoint answering the current resource version.
    pub api_url: String,
    /// Browser-like user agent sent with storefront requests.
    pub user_agent: String,
    /// Device type header sent with the version probe.
    pub device_type: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            primary_store_url: String::new(),
            secondary_store_url: String::new(),
            api_url: String::new(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            device_type: "Android".to_string(),
        }
    }
}

/// The external data tool that regenerates the master-data snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Binary name or path of the data tool.
    pub binary: String,
    /// Fixed-name scratch subdirectory the tool writes under the tracked
    /// root. Consumed and deleted every run.
    pub output_subdir: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            binary: "dbtool".to_string(),
            output_subdir: "db".to_string(),
        }
    }
}

/// The tracked git repository holding the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Tracked root. Data files live at the top level of this directory.
    pub root: PathBuf,
    /// Remote to push to after each commit.
    pub remote: String,
    /// Branch committed to and pushed.
    pub branch: String,
    /// Extension (without dot) of the tracked data files.
    pub data_extension: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            remote: "origin".to_string(),
            branch: "main".to_string(),
            data_extension: "yaml".to_string(),
        }
    }
}

/// Diff-to-image rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Binary name or path of the image renderer.
    pub binary: String,
    /// Font passed to the renderer; must cover the data's character set.
    pub font: String,
    /// Directory (relative to the tracked root) the images are written to.
    pub output_dir: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            binary: "silicon".to_string(),
            font: "Sarasa Term SC".to_string(),
            output_dir: PathBuf::from("images"),
        }
    }
}

/// Optional image upload to an object-storage style HTTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UploadConfig {
    pub enabled: bool,
    /// Base URL of the storage endpoint.
    pub base_url: String,
    /// Path prefix under the base URL.
    pub path_prefix: String,
    /// Credentials for digest authentication; omit both for anonymous PUT.
    pub username: Option<String>,
    pub password: Option<String>,
}

/// The messaging backend and its recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Base URL of the OneBot-compatible HTTP endpoint.
    pub api_base: String,
    /// Bearer token, if the endpoint requires one.
    pub access_token: Option<String>,
    /// Private-message recipient. Required for notification.
    pub user_id: Option<i64>,
    /// Group the aggregate forward goes to. Required for notification.
    pub group_id: Option<i64>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:5700".to_string(),
            access_token: None,
            user_id: None,
            group_id: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config root
// ---------------------------------------------------------------------------

/// Root of the snapdiff YAML configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub versions: VersionConfig,
    pub tool: ToolConfig,
    pub repo: RepoConfig,
    pub render: RenderConfig,
    pub upload: UploadConfig,
    pub notify: NotifyConfig,
}

// ---------------------------------------------------------------------------
// Paths + load
// ---------------------------------------------------------------------------

/// `<home>/.snapdiff/config.yaml` — pure, no I/O.
pub fn default_path_at(home: &Path) -> PathBuf {
    home.join(".snapdiff").join("config.yaml")
}

/// `default_path_at` convenience wrapper (uses `dirs::home_dir()`).
pub fn default_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    Ok(default_path_at(&home))
}

/// Load the configuration from `path`.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
