//! Thin wrapper over the `git` binary.
//!
//! Change detection is commit-then-diff: the authoritative change set is the
//! path diff of the new commit against its parent, not the staged set. That
//! yields exactly the paths that entered history, robust to any staging
//! mismatch.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{io_err, PipelineError};

/// A git repository at a fixed root.
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run(&self, args: &[&str]) -> Result<String, PipelineError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| io_err("git", e))?;
        if !output.status.success() {
            return Err(PipelineError::Git {
                command: args.join(" "),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run_quiet(&self, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Stage the given paths (relative to the root).
    pub fn add(&self, paths: &[String]) -> Result<(), PipelineError> {
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run(&args).map(|_| ())
    }

    /// Paths currently staged for commit.
    pub fn staged_paths(&self) -> Result<Vec<String>, PipelineError> {
        let output = self.run(&["diff", "--cached", "--name-only"])?;
        Ok(lines(&output))
    }

    pub fn commit(&self, message: &str) -> Result<(), PipelineError> {
        self.run(&["commit", "-m", message]).map(|_| ())
    }

    pub fn push(&self, remote: &str, branch: &str) -> Result<(), PipelineError> {
        self.run(&["push", remote, branch]).map(|_| ())
    }

    /// Paths touched by HEAD, in git's own diff order.
    ///
    /// `--root` keeps this working for the very first commit of a repo.
    pub fn changed_paths(&self) -> Result<Vec<String>, PipelineError> {
        let output = self.run(&[
            "diff-tree",
            "--no-commit-id",
            "--name-only",
            "-r",
            "--root",
            "HEAD",
        ])?;
        Ok(lines(&output))
    }

    /// Unified diff of one path between HEAD and its parent.
    ///
    /// Empty when HEAD has no parent — a root commit has no prior revision
    /// to diff against.
    pub fn diff_for(&self, path: &Path) -> Result<String, PipelineError> {
        if !self.head_has_parent() {
            return Ok(String::new());
        }
        let pathspec = path.display().to_string();
        self.run(&["diff", "HEAD~1", "HEAD", "--", &pathspec])
    }

    fn head_has_parent(&self) -> bool {
        self.run_quiet(&["rev-parse", "--verify", "--quiet", "HEAD~1"])
    }
}

fn lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
