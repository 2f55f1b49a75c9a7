//! Error types for snapdiff-version.

use thiserror::Error;

/// All errors that can arise from version resolution.
#[derive(Debug, Error)]
pub enum VersionError {
    /// Neither storefront source produced a client version, or the probe
    /// answered without a usable resource version. Fatal for the run.
    #[error("version unavailable: {reason}")]
    Unavailable { reason: String },

    /// Transport-level failure of an outbound request.
    #[error("version request failed: {0}")]
    Network(#[source] Box<ureq::Error>),

    /// The endpoint answered with an unexpected HTTP status.
    #[error("version endpoint answered HTTP {status}")]
    Status { status: u16 },

    /// Response body could not be read.
    #[error("failed to read version response: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for VersionError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => VersionError::Status { status },
            other => VersionError::Network(Box::new(other)),
        }
    }
}
