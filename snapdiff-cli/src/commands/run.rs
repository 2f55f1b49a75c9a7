//! `snapdiff run` — the full pipeline.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use snapdiff_core::types::VersionPair;
use snapdiff_pipeline::{RunOptions, RunReport};

use crate::commands::load_config;

/// Arguments for `snapdiff run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Pin the client version (skips storefront scraping).
    #[arg(long, requires = "res_version")]
    pub client_version: Option<String>,

    /// Pin the resource version (skips the version probe).
    #[arg(long, requires = "client_version")]
    pub res_version: Option<String>,

    /// Render images but do not upload them.
    #[arg(long)]
    pub skip_upload: bool,

    /// Stop after rendering; send no messages.
    #[arg(long)]
    pub skip_notify: bool,
}

impl RunArgs {
    pub fn run(self, config: Option<PathBuf>) -> Result<()> {
        let config = load_config(config)?;
        let versions = match (self.client_version, self.res_version) {
            (Some(client), Some(resource)) => Some(VersionPair::new(client, resource)),
            _ => None,
        };
        let report = snapdiff_pipeline::run(
            &config,
            RunOptions {
                versions,
                skip_upload: self.skip_upload,
                skip_notify: self.skip_notify,
            },
        )
        .context("pipeline run failed")?;
        print_report(&report, self.skip_notify);
        Ok(())
    }
}

fn print_report(report: &RunReport, skip_notify: bool) {
    println!("✓ {} ({} file(s) copied)", report.versions, report.copied);

    if report.changes.is_empty() {
        println!("  ·  no data files changed — nothing to do");
        return;
    }

    println!("  {} file(s) changed:", report.changes.len());
    for path in &report.changes {
        println!("  ✎  {}", path.display());
    }
    println!(
        "  {} image(s) rendered, {} failed",
        report.rendered,
        report.render_failed.len()
    );

    if skip_notify {
        println!("  ·  notification skipped");
    } else if report.aggregate_sent {
        println!(
            "  ✉  {} message(s) forwarded ({} send(s) failed)",
            report.records.len(),
            report.failed_sends
        );
    } else {
        println!("  ·  nothing forwarded ({} send(s) failed)", report.failed_sends);
    }
}
