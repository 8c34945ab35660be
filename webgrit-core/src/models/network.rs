//! Network event and trace export models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::request::Method;

// ============================================================================
// Network Event
// ============================================================================

/// Which side of the wire an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Outgoing request.
    Request,
    /// Incoming response.
    Response,
}

/// One observed request or response on a browser context.
///
/// Events are append-only within one inspector lifetime and preserve
/// emission order. `request_id` correlates a response with its request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkEvent {
    /// Request or response.
    pub direction: Direction,
    /// Correlation key between a request and its response.
    pub request_id: String,
    /// URL of the request or response.
    pub url: String,
    /// HTTP method, present on request events.
    #[serde(default)]
    pub method: Option<Method>,
    /// HTTP status, present on response events.
    #[serde(default)]
    pub status: Option<u16>,
    /// Headers observed on this side of the exchange.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
}

impl NetworkEvent {
    /// Creates a request event stamped with the current time.
    pub fn request(
        request_id: impl Into<String>,
        method: Method,
        url: impl Into<String>,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            direction: Direction::Request,
            request_id: request_id.into(),
            url: url.into(),
            method: Some(method),
            status: None,
            headers,
            timestamp: Utc::now(),
        }
    }

    /// Creates a response event stamped with the current time.
    pub fn response(
        request_id: impl Into<String>,
        url: impl Into<String>,
        status: u16,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            direction: Direction::Response,
            request_id: request_id.into(),
            url: url.into(),
            method: None,
            status: Some(status),
            headers,
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// Trace Export
// ============================================================================

/// One correlated request/response pair in a trace export.
///
/// A request that never received a response has all response-side fields
/// absent. An orphan response (no matching request seen) is included with
/// `orphan = true` rather than dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEntry {
    /// Correlation key.
    pub request_id: String,
    /// URL of the exchange.
    pub url: String,
    /// HTTP method, absent for orphan responses.
    #[serde(default)]
    pub method: Option<Method>,
    /// Response status, absent when no response arrived.
    #[serde(default)]
    pub status: Option<u16>,
    /// Request headers.
    #[serde(default)]
    pub request_headers: Vec<(String, String)>,
    /// Response headers, absent when no response arrived.
    #[serde(default)]
    pub response_headers: Option<Vec<(String, String)>>,
    /// When the request was emitted.
    #[serde(default)]
    pub request_time: Option<DateTime<Utc>>,
    /// When the response was observed.
    #[serde(default)]
    pub response_time: Option<DateTime<Utc>>,
    /// True for a response with no matching request.
    #[serde(default)]
    pub orphan: bool,
}

impl TraceEntry {
    /// Returns true if this request never received a response.
    pub fn is_unanswered(&self) -> bool {
        !self.orphan && self.status.is_none()
    }
}

/// A full trace document, consumable by external analysis tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkTrace {
    /// Trace format version.
    pub version: String,
    /// Name of the producing tool.
    pub creator: String,
    /// When the export was produced.
    pub exported_at: DateTime<Utc>,
    /// Entries ordered by timestamp.
    pub entries: Vec<TraceEntry>,
}

/// Counters over an inspector's accumulated log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSummary {
    /// Total request events recorded.
    pub total_requests: usize,
    /// Total response events recorded.
    pub total_responses: usize,
    /// Responses with status >= 400.
    pub failed_count: usize,
}
