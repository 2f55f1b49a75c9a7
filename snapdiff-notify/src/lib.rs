//! # snapdiff-notify
//!
//! Ordered notification batching: one summary message, one message per
//! rendered file, then a single group-forward aggregate referencing every
//! identifier the backend actually assigned, in send order.
//!
//! A send counts as successful only when the backend's own `status` field
//! says so; transport success alone proves nothing. Individual send failures
//! are logged and their identifier omitted from the aggregate — only the
//! aggregate call itself failing escalates, since that means the
//! user-visible bundle was never delivered.
//!
//! Local `file://` image references assume the messaging backend runs on
//! this machine's filesystem.

pub mod error;
pub mod protocol;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{info, warn};

use snapdiff_core::config::NotifyConfig;
use snapdiff_core::types::{ChangeSet, MessageRecord, MessageRole, RenderedImage, VersionPair};

pub use error::NotifyError;
use protocol::{ApiResponse, GroupForwardRequest, MessageSegment, PrivateMessageRequest};

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Transport seam for the messaging backend.
pub trait MessagingApi {
    fn send_private(&self, request: &PrivateMessageRequest) -> Result<ApiResponse, NotifyError>;
    fn send_group_forward(&self, request: &GroupForwardRequest)
        -> Result<ApiResponse, NotifyError>;
}

/// [`MessagingApi`] over HTTP against a OneBot-compatible endpoint.
pub struct HttpMessenger {
    api_base: String,
    access_token: Option<String>,
}

impl HttpMessenger {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        }
    }

    fn post(&self, endpoint: &str, body: impl serde::Serialize) -> Result<ApiResponse, NotifyError> {
        let url = format!("{}/{endpoint}", self.api_base);
        let mut request = ureq::post(&url);
        if let Some(token) = &self.access_token {
            request = request.set("authorization", &format!("Bearer {token}"));
        }
        let response = match request.send_json(body) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(NotifyError::Http { status, body });
            }
            Err(err) => return Err(NotifyError::Network(Box::new(err))),
        };
        let text = response.into_string()?;
        let mut parsed: ApiResponse =
            serde_json::from_str(&text).map_err(|source| NotifyError::Decode {
                source,
                body: text.clone(),
            })?;
        parsed.raw = text;
        Ok(parsed)
    }
}

impl MessagingApi for HttpMessenger {
    fn send_private(&self, request: &PrivateMessageRequest) -> Result<ApiResponse, NotifyError> {
        self.post("send_private_msg", request)
    }

    fn send_group_forward(
        &self,
        request: &GroupForwardRequest,
    ) -> Result<ApiResponse, NotifyError> {
        self.post("send_group_forward_msg", request)
    }
}

// ---------------------------------------------------------------------------
// Batcher
// ---------------------------------------------------------------------------

/// Report of one notification batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Identifiers in send order: summary first, then per-file.
    pub records: Vec<MessageRecord>,
    /// Sends the backend rejected or that failed in transport.
    pub failed_sends: usize,
    /// Whether the final aggregate forward went out.
    pub aggregate_sent: bool,
}

/// Builds and sends the notification bundle for one pipeline run.
pub struct NotificationBatcher<'a> {
    config: &'a NotifyConfig,
    api: &'a dyn MessagingApi,
}

impl<'a> NotificationBatcher<'a> {
    pub fn new(config: &'a NotifyConfig, api: &'a dyn MessagingApi) -> Self {
        Self { config, api }
    }

    /// Run the full protocol: summary, per-file messages in change-set
    /// order, then one aggregate forward of every collected identifier.
    pub fn notify(
        &self,
        versions: &VersionPair,
        changes: &ChangeSet,
        images: &HashMap<PathBuf, RenderedImage>,
    ) -> Result<BatchReport, NotifyError> {
        let user_id = self.config.user_id.ok_or(NotifyError::ConfigMissing {
            field: "notify.user_id",
        })?;
        let group_id = self.config.group_id.ok_or(NotifyError::ConfigMissing {
            field: "notify.group_id",
        })?;

        let mut report = BatchReport::default();

        let summary = PrivateMessageRequest {
            user_id,
            message: vec![MessageSegment::Text {
                text: summary_text(versions, changes),
            }],
        };
        self.record_send(&summary, MessageRole::Summary, &mut report);

        for path in changes {
            let Some(image) = images.get(path) else {
                continue;
            };
            let request = PrivateMessageRequest {
                user_id,
                message: vec![
                    MessageSegment::Text {
                        text: file_label(path),
                    },
                    MessageSegment::Image {
                        file: image.image_ref(),
                    },
                ],
            };
            self.record_send(&request, MessageRole::PerFile, &mut report);
        }

        if report.records.is_empty() {
            warn!("no message ids collected; skipping group forward");
            return Ok(report);
        }

        let forward = GroupForwardRequest {
            group_id,
            messages: report
                .records
                .iter()
                .map(|record| MessageSegment::Node {
                    id: record.message_id,
                })
                .collect(),
        };
        let response = self.api.send_group_forward(&forward)?;
        if !response.is_ok() {
            return Err(NotifyError::AggregateRejected {
                body: response.diagnostic(),
            });
        }
        report.aggregate_sent = true;
        info!(
            "forwarded {} message(s) to group {group_id}",
            report.records.len()
        );
        Ok(report)
    }

    fn record_send(
        &self,
        request: &PrivateMessageRequest,
        role: MessageRole,
        report: &mut BatchReport,
    ) {
        match self.api.send_private(request) {
            Ok(response) if response.is_ok() => match response.message_id() {
                Some(message_id) => report.records.push(MessageRecord { message_id, role }),
                None => {
                    warn!("send reported ok but carried no message id");
                    report.failed_sends += 1;
                }
            },
            Ok(response) => {
                warn!("backend rejected send: {}", response.diagnostic());
                report.failed_sends += 1;
            }
            Err(err) => {
                warn!("private send failed: {err}");
                report.failed_sends += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Message bodies
// ---------------------------------------------------------------------------

/// Summary body: timestamp, versions, count, and every changed path —
/// including those that failed to render — one line each, stable order.
fn summary_text(versions: &VersionPair, changes: &ChangeSet) -> String {
    let mut text = format!(
        "[{}] master data updated\nclient version: {}\nresource version: {}\n{} file(s) changed:",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        versions.client_version,
        versions.resource_version,
        changes.len()
    );
    for path in changes {
        text.push_str(&format!("\n- {}", path.display()));
    }
    text
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
