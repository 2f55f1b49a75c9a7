//! Snapshot regeneration via the external data tool.
//!
//! The tool writes into a fixed-name scratch subdirectory of the tracked
//! root; its data files are copied out (overwriting) and the scratch
//! directory is deleted so nothing leaks into the next run.

use std::ffi::OsStr;
use std::path::Path;

use snapdiff_core::config::ToolConfig;
use snapdiff_core::tool::ExternalTool;
use snapdiff_core::types::VersionPair;
use tracing::{info, warn};

use crate::error::{io_err, PipelineError};

/// Runs the data tool and relocates its output into the tracked tree.
pub struct SnapshotUpdater<'a> {
    config: &'a ToolConfig,
    repo_root: &'a Path,
    data_extension: &'a str,
    tool: &'a dyn ExternalTool,
}

impl<'a> SnapshotUpdater<'a> {
    pub fn new(
        config: &'a ToolConfig,
        repo_root: &'a Path,
        data_extension: &'a str,
        tool: &'a dyn ExternalTool,
    ) -> Self {
        Self {
            config,
            repo_root,
            data_extension,
            tool,
        }
    }

    /// Regenerate the snapshot for `versions`. Returns the number of data
    /// files copied out of the scratch directory.
    pub fn update(&self, versions: &VersionPair) -> Result<usize, PipelineError> {
        if !self.tool.locate() {
            return Err(PipelineError::ToolNotFound {
                binary: self.config.binary.clone(),
            });
        }

        let output = self
            .tool
            .run(&[
                "--dbonly",
                "--client-version",
                &versions.client_version,
                "--res-info",
                &versions.resource_version,
            ])
            .map_err(|e| io_err(&self.config.binary, e))?;
        if !output.success {
            return Err(PipelineError::ToolExecutionFailed {
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        collect_output(
            self.repo_root,
            &self.config.output_subdir,
            self.data_extension,
        )
    }
}

/// Copy every data file out of `<root>/<subdir>` into `root`, then delete
/// the scratch directory outright. An absent scratch directory is a warning,
/// not an error — the tool may have produced nothing.
pub(crate) fn collect_output(
    root: &Path,
    subdir: &str,
    extension: &str,
) -> Result<usize, PipelineError> {
    let scratch = root.join(subdir);
    if !scratch.is_dir() {
        warn!("tool produced no output directory at {}", scratch.display());
        return Ok(0);
    }

    let mut copied = 0;
    for entry in std::fs::read_dir(&scratch).map_err(|e| io_err(&scratch, e))? {
        let entry = entry.map_err(|e| io_err(&scratch, e))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(OsStr::to_str) != Some(extension) {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        std::fs::copy(&path, root.join(name)).map_err(|e| io_err(&path, e))?;
        copied += 1;
    }

    std::fs::remove_dir_all(&scratch).map_err(|e| io_err(&scratch, e))?;
    info!(
        "copied {copied} data file(s) out of {}",
        scratch.display()
    );
    Ok(copied)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use snapdiff_core::tool::ToolOutput;
    use tempfile::TempDir;

    use super::*;

    /// Fake data tool that writes scripted files into the scratch dir.
    struct FakeTool {
        present: bool,
        exit_code: i32,
        files: Vec<(&'static str, &'static str)>,
        root: std::path::PathBuf,
        subdir: &'static str,
    }

    impl ExternalTool for FakeTool {
        fn locate(&self) -> bool {
            self.present
        }

        fn run(&self, _args: &[&str]) -> std::io::Result<ToolOutput> {
            if self.exit_code == 0 && !self.files.is_empty() {
                let scratch = self.root.join(self.subdir);
                fs::create_dir_all(&scratch)?;
                for (name, contents) in &self.files {
                    fs::write(scratch.join(name), contents)?;
                }
            }
            Ok(ToolOutput {
                success: self.exit_code == 0,
                code: Some(self.exit_code),
                stdout: String::new(),
                stderr: if self.exit_code == 0 {
                    String::new()
                } else {
                    "asset decrypt failed".to_string()
                },
            })
        }

        fn run_with_stdin(&self, args: &[&str], _input: &str) -> std::io::Result<ToolOutput> {
            self.run(args)
        }
    }

    fn versions() -> VersionPair {
        VersionPair::new("3.4.1", "R04_21_00")
    }

    #[test]
    fn copies_data_files_and_deletes_scratch() {
        let root = TempDir::new().expect("root");
        let config = ToolConfig::default();
        let tool = FakeTool {
            present: true,
            exit_code: 0,
            files: vec![
                ("characters.yaml", "id: 1\n"),
                ("events.yaml", "id: 2\n"),
                ("readme.txt", "not data"),
            ],
            root: root.path().to_path_buf(),
            subdir: "db",
        };
        let updater = SnapshotUpdater::new(&config, root.path(), "yaml", &tool);

        let copied = updater.update(&versions()).expect("update");

        assert_eq!(copied, 2, "only data-extension files count");
        assert!(root.path().join("characters.yaml").exists());
        assert!(root.path().join("events.yaml").exists());
        assert!(!root.path().join("readme.txt").exists());
        assert!(!root.path().join("db").exists(), "scratch must be deleted");
    }

    #[test]
    fn overwrites_existing_files() {
        let root = TempDir::new().expect("root");
        fs::write(root.path().join("characters.yaml"), "old").expect("seed");
        let config = ToolConfig::default();
        let tool = FakeTool {
            present: true,
            exit_code: 0,
            files: vec![("characters.yaml", "new")],
            root: root.path().to_path_buf(),
            subdir: "db",
        };
        SnapshotUpdater::new(&config, root.path(), "yaml", &tool)
            .update(&versions())
            .expect("update");

        let contents = fs::read_to_string(root.path().join("characters.yaml")).expect("read");
        assert_eq!(contents, "new");
    }

    #[test]
    fn absent_scratch_directory_is_non_fatal() {
        let root = TempDir::new().expect("root");
        let config = ToolConfig::default();
        let tool = FakeTool {
            present: true,
            exit_code: 0,
            files: vec![],
            root: root.path().to_path_buf(),
            subdir: "db",
        };
        let copied = SnapshotUpdater::new(&config, root.path(), "yaml", &tool)
            .update(&versions())
            .expect("update");
        assert_eq!(copied, 0);
    }

    #[test]
    fn missing_tool_is_tool_not_found() {
        let root = TempDir::new().expect("root");
        let config = ToolConfig::default();
        let tool = FakeTool {
            present: false,
            exit_code: 0,
            files: vec![],
            root: root.path().to_path_buf(),
            subdir: "db",
        };
        let err = SnapshotUpdater::new(&config, root.path(), "yaml", &tool)
            .update(&versions())
            .expect_err("must fail");
        assert!(matches!(err, PipelineError::ToolNotFound { .. }));
    }

    #[test]
    fn nonzero_exit_is_execution_failure() {
        let root = TempDir::new().expect("root");
        let config = ToolConfig::default();
        let tool = FakeTool {
            present: true,
            exit_code: 2,
            files: vec![],
            root: root.path().to_path_buf(),
            subdir: "db",
        };
        let err = SnapshotUpdater::new(&config, root.path(), "yaml", &tool)
            .update(&versions())
            .expect_err("must fail");
        match err {
            PipelineError::ToolExecutionFailed { code, stderr } => {
                assert_eq!(code, Some(2));
                assert_eq!(stderr, "asset decrypt failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
