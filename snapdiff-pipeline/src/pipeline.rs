//! Pipeline sequencing.
//!
//! One controller value owns every piece of inter-stage state — the resolved
//! versions, the change set, the per-file image map, the collected message
//! records. Stages run strictly in order, and a stage only runs when its
//! input state is non-empty: an empty change set ends the run before any
//! rendering or notification happens.

use std::collections::HashMap;
use std::path::PathBuf;

use snapdiff_core::config::Config;
use snapdiff_core::tool::SystemTool;
use snapdiff_core::types::{ChangeSet, MessageRecord, RenderedImage, VersionPair};
use snapdiff_notify::{HttpMessenger, NotificationBatcher};
use snapdiff_render::DiffRenderer;
use tracing::info;

use crate::error::PipelineError;
use crate::snapshot::SnapshotUpdater;
use crate::tracker::ChangeTracker;

// ---------------------------------------------------------------------------
// Options + report
// ---------------------------------------------------------------------------

/// Per-run switches.
#[derive(Debug, Default)]
pub struct RunOptions {
    /// Pinned versions; skips the resolver entirely when set.
    pub versions: Option<VersionPair>,
    /// Render images but do not upload them.
    pub skip_upload: bool,
    /// Stop after rendering; send no messages.
    pub skip_notify: bool,
}

/// What one run did, for the CLI printer.
#[derive(Debug)]
pub struct RunReport {
    pub versions: VersionPair,
    /// Data files copied out of the tool's scratch directory.
    pub copied: usize,
    pub changes: ChangeSet,
    pub rendered: usize,
    pub render_failed: Vec<PathBuf>,
    /// Message records in send order (empty when notification was skipped).
    pub records: Vec<MessageRecord>,
    pub failed_sends: usize,
    pub aggregate_sent: bool,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns all inter-stage state for one run. The version pair is resolved
/// before the controller exists and is immutable afterwards.
struct PipelineController<'a> {
    config: &'a Config,
    versions: VersionPair,
    copied: usize,
    changes: ChangeSet,
    images: HashMap<PathBuf, RenderedImage>,
    render_failed: Vec<PathBuf>,
    records: Vec<MessageRecord>,
    failed_sends: usize,
    aggregate_sent: bool,
}

/// Run the full pipeline for `config`.
///
/// This is the canonical entrypoint for `snapdiff run`.
pub fn run(config: &Config, options: RunOptions) -> Result<RunReport, PipelineError> {
    let versions = match options.versions {
        Some(versions) => {
            info!("using pinned {versions}");
            versions
        }
        None => snapdiff_version::resolve(&config.versions)?,
    };
    info!("resolved {versions}");

    let mut controller = PipelineController::new(config, versions);
    controller.update_snapshot()?;
    controller.commit_and_detect()?;

    if controller.changes.is_empty() {
        info!("no data files changed; nothing to do");
        return Ok(controller.into_report());
    }

    controller.render(options.skip_upload)?;
    if options.skip_notify {
        info!("notification skipped by request");
    } else {
        controller.notify()?;
    }
    Ok(controller.into_report())
}

impl<'a> PipelineController<'a> {
    fn new(config: &'a Config, versions: VersionPair) -> Self {
        Self {
            config,
            versions,
            copied: 0,
            changes: ChangeSet::default(),
            images: HashMap::new(),
            render_failed: Vec::new(),
            records: Vec::new(),
            failed_sends: 0,
            aggregate_sent: false,
        }
    }

    fn update_snapshot(&mut self) -> Result<(), PipelineError> {
        let tool = SystemTool::in_dir(&self.config.tool.binary, &self.config.repo.root);
        let updater = SnapshotUpdater::new(
            &self.config.tool,
            &self.config.repo.root,
            &self.config.repo.data_extension,
            &tool,
        );
        self.copied = updater.update(&self.versions)?;
        Ok(())
    }

    fn commit_and_detect(&mut self) -> Result<(), PipelineError> {
        let tracker = ChangeTracker::new(&self.config.repo);
        self.changes = tracker.commit_and_detect(&self.versions)?;
        Ok(())
    }

    fn render(&mut self, skip_upload: bool) -> Result<(), PipelineError> {
        let tracker = ChangeTracker::new(&self.config.repo);
        let tool = SystemTool::new(&self.config.render.binary);
        let output_dir = self.config.repo.root.join(&self.config.render.output_dir);
        let upload = (!skip_upload).then_some(&self.config.upload);
        let renderer = DiffRenderer::new(&self.config.render, output_dir, upload, &tool);

        let outcome = renderer.render_all(&self.changes, |path| tracker.diff_for(path))?;
        self.images = outcome.images;
        self.render_failed = outcome.failed;
        Ok(())
    }

    fn notify(&mut self) -> Result<(), PipelineError> {
        let messenger = HttpMessenger::new(&self.config.notify);
        let batcher = NotificationBatcher::new(&self.config.notify, &messenger);
        let report = batcher.notify(&self.versions, &self.changes, &self.images)?;
        self.records = report.records;
        self.failed_sends = report.failed_sends;
        self.aggregate_sent = report.aggregate_sent;
        Ok(())
    }

    fn into_report(self) -> RunReport {
        RunReport {
            versions: self.versions,
            copied: self.copied,
            changes: self.changes,
            rendered: self.images.len(),
            render_failed: self.render_failed,
            records: self.records,
            failed_sends: self.failed_sends,
            aggregate_sent: self.aggregate_sent,
        }
    }
}
