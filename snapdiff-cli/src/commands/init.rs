//! `snapdiff init` — write a starter configuration file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::commands::config_path;

/// Commented starter config; every value shown is the default.
const STARTER_CONFIG: &str = r#"# snapdiff configuration.

versions:
  # Storefront page scraped for the client version.
  primary_store_url: ""
  # Fallback page, consulted only when the primary yields nothing.
  secondary_store_url: ""
  # Login endpoint answering the resource version in its x-res-version header.
  api_url: ""
  device_type: "Android"

tool:
  # External data tool regenerating the snapshot.
  binary: "dbtool"
  # Scratch subdirectory the tool writes under the tracked root.
  output_subdir: "db"

repo:
  # Tracked git root holding the data files.
  root: "."
  remote: "origin"
  branch: "main"
  data_extension: "yaml"

render:
  binary: "silicon"
  font: "Sarasa Term SC"
  output_dir: "images"

upload:
  enabled: false
  base_url: ""
  path_prefix: "masterdata"
  # username: "uploader"
  # password: "secret"

notify:
  api_base: "http://127.0.0.1:5700"
  # access_token: "token"
  # user_id: 10001
  # group_id: 20002
"#;

/// Arguments for `snapdiff init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self, config: Option<PathBuf>) -> Result<()> {
        let path = config_path(config)?;
        if path.exists() && !self.force {
            bail!(
                "config already exists at {}; pass --force to overwrite",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, STARTER_CONFIG)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("✓ wrote starter config to {}", path.display());
        Ok(())
    }
}
