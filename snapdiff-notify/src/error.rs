//! Error types for snapdiff-notify.

use thiserror::Error;

/// All errors that can arise from notification batching.
///
/// Per-message send failures are recovered inside the batcher (logged, id
/// omitted); only configuration gaps and the final aggregate call surface
/// as errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Required recipient configuration is absent. Checked before any
    /// network call is made.
    #[error("missing required configuration: {field}")]
    ConfigMissing { field: &'static str },

    /// Transport-level failure of an outbound request.
    #[error("messaging request failed: {0}")]
    Network(#[source] Box<ureq::Error>),

    /// The endpoint answered with an unexpected HTTP status.
    #[error("messaging endpoint answered HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body could not be read.
    #[error("failed to read messaging response: {0}")]
    Io(#[from] std::io::Error),

    /// Response body was not the expected envelope.
    #[error("unparseable messaging response ({source}): {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// The final group-forward call was rejected — the user-visible bundle
    /// was never delivered.
    #[error("group forward rejected by backend: {body}")]
    AggregateRejected { body: String },
}
