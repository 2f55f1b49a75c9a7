//! Commit, push, and authoritative change detection.
//!
//! Staging enumerates data files at the top level of the tracked root only,
//! so the tool's scratch subdirectory and the image output directory are
//! never staged. The change set is then read back from the commit itself.

use std::path::{Path, PathBuf};

use chrono::Utc;
use snapdiff_core::config::RepoConfig;
use snapdiff_core::types::{ChangeSet, VersionPair};
use tracing::info;

use crate::error::{io_err, PipelineError};
use crate::git::Git;

/// Commits the refreshed snapshot and reports what actually changed.
pub struct ChangeTracker<'a> {
    config: &'a RepoConfig,
    git: Git,
}

impl<'a> ChangeTracker<'a> {
    pub fn new(config: &'a RepoConfig) -> Self {
        Self {
            config,
            git: Git::new(&config.root),
        }
    }

    /// Stage, commit, push, and detect. "Nothing staged" is an empty
    /// [`ChangeSet`], never an error, and performs no commit or push.
    pub fn commit_and_detect(
        &self,
        versions: &VersionPair,
    ) -> Result<ChangeSet, PipelineError> {
        let candidates = self.data_files_at_root()?;
        if !candidates.is_empty() {
            self.git.add(&candidates)?;
        }

        let staged = self.git.staged_paths()?;
        if staged.is_empty() {
            info!("nothing staged; snapshot unchanged");
            return Ok(ChangeSet::default());
        }

        let message = commit_message(&versions.resource_version, Utc::now());
        self.git.commit(&message)?;
        self.git.push(&self.config.remote, &self.config.branch)?;
        info!("committed and pushed {} path(s) as '{message}'", staged.len());

        let changed = self.git.changed_paths()?;
        Ok(ChangeSet(
            changed
                .into_iter()
                .filter(|path| self.is_data_path(path))
                .map(PathBuf::from)
                .collect(),
        ))
    }

    /// Unified diff for one changed path (between the new commit and its
    /// parent).
    pub fn diff_for(&self, path: &Path) -> Result<String, PipelineError> {
        self.git.diff_for(path)
    }

    /// Top-level data files in the tracked root, sorted for a stable `add`.
    fn data_files_at_root(&self) -> Result<Vec<String>, PipelineError> {
        let root = &self.config.root;
        let mut files = Vec::new();
        for entry in std::fs::read_dir(root).map_err(|e| io_err(root, e))? {
            let entry = entry.map_err(|e| io_err(root, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if self.is_data_path(name) {
                files.push(name.to_string());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Data paths are top-level files with the configured extension; anything
    /// under a subdirectory (scratch output, rendered images) is not data.
    fn is_data_path(&self, path: &str) -> bool {
        !path.contains('/') && path.ends_with(&format!(".{}", self.config.data_extension))
    }
}

/// Commit message: the resource version, or a timestamp when it is unset.
fn commit_message(resource_version: &str, now: chrono::DateTime<Utc>) -> String {
    if resource_version.is_empty() {
        now.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        resource_version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn commit_message_uses_resource_version() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
        assert_eq!(commit_message("R04_21_00", now), "R04_21_00");
    }

    #[test]
    fn commit_message_falls_back_to_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
        assert_eq!(commit_message("", now), "2026-08-06 12:00:00");
    }

    #[test]
    fn data_path_filter() {
        let config = RepoConfig::default();
        let tracker = ChangeTracker::new(&config);
        assert!(tracker.is_data_path("characters.yaml"));
        assert!(!tracker.is_data_path("db/characters.yaml"));
        assert!(!tracker.is_data_path("images/characters.yaml.jpg"));
        assert!(!tracker.is_data_path("notes.txt"));
    }
}
