//! Stream event vocabulary and the sink seam the pipeline emits through.
//!
//! Every event crosses the wire as `data: <json>\n\n` with the variant name
//! in a `type` field. Both streaming endpoints reuse the same frames; only
//! response headers differ.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::error;

use crate::models::recommendation::{Recommendation, UserContext};

/// Pause after each processed control so chunked consumers render
/// incrementally instead of receiving one burst.
pub const STREAM_PACING: Duration = Duration::from_millis(100);

/// Events buffered between the producer task and the response body.
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Status {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        survey_id: Option<u32>,
    },
    Warning {
        message: String,
    },
    UserContext {
        data: UserContext,
    },
    Progress {
        current: usize,
        total: usize,
        percentage: f64,
    },
    Recommendation {
        data: Recommendation,
    },
    Summary {
        total_recommendations: usize,
        survey_id: u32,
        timestamp: String,
    },
    Error {
        message: String,
    },
    End,
}

impl StreamEvent {
    pub fn status(message: impl Into<String>) -> Self {
        StreamEvent::Status {
            message: message.into(),
            survey_id: None,
        }
    }

    pub fn status_with_id(message: impl Into<String>, survey_id: u32) -> Self {
        StreamEvent::Status {
            message: message.into(),
            survey_id: Some(survey_id),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        StreamEvent::Warning {
            message: message.into(),
        }
    }

    /// Wire framing shared by the chunked and SSE endpoints.
    pub fn to_frame(&self) -> String {
        // Every variant is a plain struct of JSON-safe fields, so
        // serialization only fails if that stops being true.
        let json = serde_json::to_string(self).unwrap_or_else(|e| {
            error!("failed to serialize stream event: {e}");
            format!(r#"{{"type":"{}"}}"#, self.kind())
        });
        format!("data: {json}\n\n")
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Status { .. } => "status",
            StreamEvent::Warning { .. } => "warning",
            StreamEvent::UserContext { .. } => "user_context",
            StreamEvent::Progress { .. } => "progress",
            StreamEvent::Recommendation { .. } => "recommendation",
            StreamEvent::Summary { .. } => "summary",
            StreamEvent::Error { .. } => "error",
            StreamEvent::End => "end",
        }
    }
}

/// The consumer went away; the producer should stop generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientGone;

/// Where the pipeline sends its events. The blocking endpoint plugs in
/// [`NullSink`]; the streaming endpoints use [`ChannelSink`] whose receiver
/// feeds the response body.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: StreamEvent) -> Result<(), ClientGone>;

    /// Optional pacing after each processed control. No-op by default.
    async fn pace(&self) {}
}

/// Swallows every event. Used by the blocking endpoint, which only wants
/// the final result.
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn emit(&self, _event: StreamEvent) -> Result<(), ClientGone> {
        Ok(())
    }
}

/// Forwards events into an mpsc channel. A dropped receiver means the
/// client disconnected, which surfaces as [`ClientGone`].
pub struct ChannelSink {
    tx: mpsc::Sender<StreamEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<StreamEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, event: StreamEvent) -> Result<(), ClientGone> {
        self.tx.send(event).await.map_err(|_| ClientGone)
    }

    async fn pace(&self) {
        sleep(STREAM_PACING).await;
    }
}
