pub mod init;
pub mod run;
pub mod version;

use std::path::PathBuf;

use anyhow::{Context, Result};

use snapdiff_core::config::{self, Config};

/// Resolve the config path: explicit `--config` wins, else the default under
/// the home directory.
pub(crate) fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => config::default_path().context("could not determine config location"),
    }
}

/// Load the configuration for a command.
pub(crate) fn load_config(explicit: Option<PathBuf>) -> Result<Config> {
    let path = config_path(explicit)?;
    config::load_at(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))
}
