//! Domain types shared across the snapdiff pipeline.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths. Types that appear in run reports derive serde traits.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// VersionPair
// ---------------------------------------------------------------------------

/// The resolved (client, resource) version pair for one run.
///
/// Both tokens are opaque: dotted-numeric for the client (`"3.4.1"`),
/// scheme-prefixed for the resource (`"R04_21_00"`). Produced once per run by
/// the version resolver and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPair {
    pub client_version: String,
    pub resource_version: String,
}

impl VersionPair {
    pub fn new(client: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            client_version: client.into(),
            resource_version: resource.into(),
        }
    }
}

impl fmt::Display for VersionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "client {} / resource {}",
            self.client_version, self.resource_version
        )
    }
}

// ---------------------------------------------------------------------------
// ChangeSet
// ---------------------------------------------------------------------------

/// Ordered set of data-file paths that entered history in this run.
///
/// Order is the version control system's own diff ordering and is preserved
/// end to end — it determines notification order. Empty is a valid terminal
/// state ("nothing to do").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(pub Vec<PathBuf>);

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.0.iter()
    }
}

impl From<Vec<PathBuf>> for ChangeSet {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self(paths)
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// RenderedImage
// ---------------------------------------------------------------------------

/// One successfully rendered diff image, keyed by its source path.
///
/// `remote_uri` is present only when upload is configured and succeeded;
/// without it the notification falls back to a local-file reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub source_path: PathBuf,
    pub image_path: PathBuf,
    pub remote_uri: Option<String>,
}

impl RenderedImage {
    /// Reference used in the outgoing image segment: the uploaded URI when
    /// present, else a `file://` pointer at the local image. The local form
    /// assumes the messaging backend shares this machine's filesystem.
    pub fn image_ref(&self) -> String {
        match &self.remote_uri {
            Some(uri) => uri.clone(),
            None => format!("file://{}", self.image_path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// MessageRecord
// ---------------------------------------------------------------------------

/// What a recorded message identifier stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// The run summary message (always sent first).
    Summary,
    /// One per rendered change-set entry.
    PerFile,
}

/// A message identifier assigned by the messaging backend.
///
/// Identifiers are opaque; only their order and presence matter. The ordered
/// sequence of records is the sole input to the final aggregate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub message_id: i64,
    pub role: MessageRole,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
