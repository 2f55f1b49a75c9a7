//! Typed wire payloads for the OneBot-compatible messaging backend.
//!
//! Requests and responses are serde structs end to end; the backend's
//! `status` field is the only success signal, and `data.message_id` the only
//! value the pipeline ever reads back.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Outgoing segments
// ---------------------------------------------------------------------------

/// One segment of an outgoing message.
///
/// Serializes to the backend's `{"type": ..., "data": {...}}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum MessageSegment {
    Text { text: String },
    Image { file: String },
    /// Reference to a previously sent message, used in forward bundles.
    Node { id: i64 },
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// `POST /send_private_msg`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivateMessageRequest {
    pub user_id: i64,
    pub message: Vec<MessageSegment>,
}

/// `POST /send_group_forward_msg`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupForwardRequest {
    pub group_id: i64,
    pub messages: Vec<MessageSegment>,
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Backend reply envelope. `status == "ok"` is the sole success signal;
/// anything else (or an absent field) is a rejected send.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub retcode: Option<i64>,
    #[serde(default)]
    pub data: Option<ResponseData>,
    /// Raw body as received, kept for diagnostics on rejection.
    #[serde(skip)]
    pub raw: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseData {
    #[serde(default)]
    pub message_id: Option<i64>,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    pub fn message_id(&self) -> Option<i64> {
        self.data.as_ref().and_then(|d| d.message_id)
    }

    /// Whatever best describes the response in a log line.
    pub fn diagnostic(&self) -> String {
        if self.raw.is_empty() {
            format!("status '{}' (retcode {:?})", self.status, self.retcode)
        } else {
            self.raw.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
