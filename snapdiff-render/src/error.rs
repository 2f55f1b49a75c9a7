//! Error types for snapdiff-render.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from diff rendering.
///
/// Only [`RenderError::RendererNotFound`] and I/O failures around the output
/// directory abort a whole render pass; per-file variants are logged by the
/// caller and the pass continues.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer binary could not be located.
    #[error("renderer binary '{binary}' not found")]
    RendererNotFound { binary: String },

    /// The renderer process could not be spawned or piped.
    #[error("failed to run renderer: {0}")]
    Spawn(std::io::Error),

    /// The renderer exited non-zero for one source file.
    #[error("renderer exited with {code:?} for {path}: {stderr}")]
    RenderFailed {
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// The renderer reported success but wrote no output file.
    #[error("renderer produced no file at {path}")]
    MissingOutput { path: PathBuf },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`RenderError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
