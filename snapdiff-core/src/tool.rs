//! Injected subprocess capability.
//!
//! External binaries (the data tool, git, the diff renderer) are driven
//! through [`ExternalTool`], so stage logic can be exercised against fakes.

use std::path::PathBuf;
use std::process::{Command, Stdio};

// ---------------------------------------------------------------------------
// ExternalTool
// ---------------------------------------------------------------------------

/// Captured outcome of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    /// Exit code, absent when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// An external binary the pipeline can probe for and run.
pub trait ExternalTool {
    /// Whether the underlying binary can be found at all.
    fn locate(&self) -> bool;

    /// Run with `args`, no stdin, and wait for exit.
    fn run(&self, args: &[&str]) -> std::io::Result<ToolOutput>;

    /// Run with `args`, writing `input` to the child's stdin.
    fn run_with_stdin(&self, args: &[&str], input: &str) -> std::io::Result<ToolOutput>;
}

// ---------------------------------------------------------------------------
// SystemTool
// ---------------------------------------------------------------------------

/// [`ExternalTool`] backed by a real process spawn.
#[derive(Debug, Clone)]
pub struct SystemTool {
    program: PathBuf,
    cwd: Option<PathBuf>,
}

impl SystemTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            cwd: None,
        }
    }

    /// Like [`SystemTool::new`] but the process runs with `cwd` as its
    /// working directory.
    pub fn in_dir(program: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            cwd: Some(cwd.into()),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

impl ExternalTool for SystemTool {
    fn locate(&self) -> bool {
        // Explicit paths are checked directly; bare names are searched on PATH.
        if self.program.components().count() > 1 {
            return self.program.is_file();
        }
        let Some(paths) = std::env::var_os("PATH") else {
            return false;
        };
        std::env::split_paths(&paths).any(|dir| dir.join(&self.program).is_file())
    }

    fn run(&self, args: &[&str]) -> std::io::Result<ToolOutput> {
        let output = self.command(args).output()?;
        Ok(capture(output))
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> std::io::Result<ToolOutput> {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            use std::io::Write;
            stdin.write_all(input.as_bytes())?;
        }
        let output = child.wait_with_output()?;
        Ok(capture(output))
    }
}

fn capture(output: std::process::Output) -> ToolOutput {
    ToolOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn locates_binaries_on_path() {
        assert!(SystemTool::new("sh").locate());
        assert!(!SystemTool::new("definitely-not-a-real-binary-9f2c").locate());
    }

    #[test]
    fn locates_explicit_paths_directly() {
        let tmp = tempfile::TempDir::new().expect("tmp");
        let file = tmp.path().join("tool");
        assert!(!SystemTool::new(&file).locate());
        std::fs::write(&file, "").expect("write");
        assert!(SystemTool::new(&file).locate());
    }

    #[test]
    #[cfg(unix)]
    fn run_captures_stdout_and_status() {
        let out = SystemTool::new("sh")
            .run(&["-c", "echo hello; exit 0"])
            .expect("run sh");
        assert!(out.success);
        assert_eq!(out.code, Some(0));
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    #[cfg(unix)]
    fn run_reports_nonzero_exit() {
        let out = SystemTool::new("sh")
            .run(&["-c", "echo oops >&2; exit 3"])
            .expect("run sh");
        assert!(!out.success);
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stderr.trim(), "oops");
    }

    #[test]
    #[cfg(unix)]
    fn run_with_stdin_pipes_input() {
        let out = SystemTool::new("cat")
            .run_with_stdin(&[], "piped input")
            .expect("run cat");
        assert!(out.success);
        assert_eq!(out.stdout, "piped input");
    }

    #[test]
    fn missing_binary_is_spawn_error() {
        let err = SystemTool::new("definitely-not-a-real-binary-9f2c")
            .run(&[])
            .expect_err("should fail to spawn");
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
