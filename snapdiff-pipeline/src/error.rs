//! Error types for snapdiff-pipeline.

use std::path::PathBuf;

use thiserror::Error;

use snapdiff_notify::NotifyError;
use snapdiff_render::RenderError;
use snapdiff_version::VersionError;

/// All errors that can abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The external data tool binary could not be located.
    #[error("data tool '{binary}' not found")]
    ToolNotFound { binary: String },

    /// The data tool ran but exited non-zero.
    #[error("data tool exited with {code:?}: {stderr}")]
    ToolExecutionFailed {
        code: Option<i32>,
        stderr: String,
    },

    /// A git invocation failed.
    #[error("`git {command}` failed (status {code:?}): {stderr}")]
    Git {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Version resolution failed (fatal; nothing downstream runs).
    #[error("version resolution failed: {0}")]
    Version(#[from] VersionError),

    /// The render stage failed as a whole (renderer missing).
    #[error("render stage failed: {0}")]
    Render(#[from] RenderError),

    /// The notification stage failed (missing config or rejected aggregate).
    #[error("notification stage failed: {0}")]
    Notify(#[from] NotifyError),
}

/// Convenience constructor for [`PipelineError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PipelineError {
    PipelineError::Io {
        path: path.into(),
        source,
    }
}
