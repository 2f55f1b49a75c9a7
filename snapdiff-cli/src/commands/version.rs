//! `snapdiff version` — resolve and print the current version pair.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::commands::load_config;

/// Arguments for `snapdiff version`.
#[derive(Args, Debug)]
pub struct VersionArgs {}

impl VersionArgs {
    pub fn run(self, config: Option<PathBuf>) -> Result<()> {
        let config = load_config(config)?;
        let versions =
            snapdiff_version::resolve(&config.versions).context("version resolution failed")?;
        println!("client version:   {}", versions.client_version);
        println!("resource version: {}", versions.resource_version);
        Ok(())
    }
}
