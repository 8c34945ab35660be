//! Network traffic inspection.
//!
//! The inspector accumulates request/response events from a browser
//! context and answers summary and export queries over them. Reads are
//! idempotent and non-destructive; the log only shrinks on an explicit
//! [`NetworkInspector::clear`].

use chrono::Utc;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use webgrit_core::{Direction, NetworkEvent, NetworkSummary, NetworkTrace, TraceEntry};

/// Trace format version stamped on exports.
const TRACE_VERSION: &str = "1.0";

// ============================================================================
// Network Inspector
// ============================================================================

/// Append-only log of observed network events.
#[derive(Debug, Default)]
pub struct NetworkInspector {
    events: Vec<NetworkEvent>,
}

impl NetworkInspector {
    /// Creates an empty inspector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one event, preserving emission order.
    ///
    /// A response with no previously seen request is still recorded; it
    /// surfaces in exports tagged as an orphan.
    pub fn record(&mut self, event: NetworkEvent) {
        if event.direction == Direction::Response
            && !self.events.iter().any(|e| {
                e.direction == Direction::Request && e.request_id == event.request_id
            })
        {
            warn!(request_id = %event.request_id, url = %event.url, "Orphan response recorded");
        }
        self.events.push(event);
    }

    /// The accumulated events, in emission order.
    pub fn events(&self) -> &[NetworkEvent] {
        &self.events
    }

    /// Discards the accumulated log.
    pub fn clear(&mut self) {
        debug!(discarded = self.events.len(), "Network inspector cleared");
        self.events.clear();
    }

    /// Counters over the accumulated log.
    ///
    /// `failed_count` is responses with status >= 400. A request still
    /// waiting for its response is not failed yet; callers that want
    /// the final verdict over a closed log use [`export`] and check
    /// [`TraceEntry::is_unanswered`].
    ///
    /// [`export`]: NetworkInspector::export
    pub fn summary(&self) -> NetworkSummary {
        let failed_count = self
            .events
            .iter()
            .filter(|e| {
                e.direction == Direction::Response && e.status.is_some_and(|s| s >= 400)
            })
            .count();

        NetworkSummary {
            total_requests: self
                .events
                .iter()
                .filter(|e| e.direction == Direction::Request)
                .count(),
            total_responses: self
                .events
                .iter()
                .filter(|e| e.direction == Direction::Response)
                .count(),
            failed_count,
        }
    }

    /// Produces the structured trace document.
    ///
    /// Request/response pairs are correlated by `request_id` (duplicate
    /// ids pair first-to-first) and ordered by timestamp. Unanswered
    /// requests keep a null response side; orphan responses become
    /// entries tagged `orphan`.
    pub fn export(&self) -> NetworkTrace {
        let mut entries: Vec<TraceEntry> = Vec::new();
        // request_id -> indices of entries still awaiting a response
        let mut open: HashMap<String, VecDeque<usize>> = HashMap::new();

        for event in &self.events {
            match event.direction {
                Direction::Request => {
                    open.entry(event.request_id.clone())
                        .or_default()
                        .push_back(entries.len());
                    entries.push(TraceEntry {
                        request_id: event.request_id.clone(),
                        url: event.url.clone(),
                        method: event.method,
                        status: None,
                        request_headers: event.headers.clone(),
                        response_headers: None,
                        request_time: Some(event.timestamp),
                        response_time: None,
                        orphan: false,
                    });
                }
                Direction::Response => {
                    let matched = open
                        .get_mut(&event.request_id)
                        .and_then(VecDeque::pop_front);
                    match matched {
                        Some(index) => {
                            let entry = &mut entries[index];
                            entry.status = event.status;
                            entry.response_headers = Some(event.headers.clone());
                            entry.response_time = Some(event.timestamp);
                        }
                        None => {
                            entries.push(TraceEntry {
                                request_id: event.request_id.clone(),
                                url: event.url.clone(),
                                method: None,
                                status: event.status,
                                request_headers: Vec::new(),
                                response_headers: Some(event.headers.clone()),
                                request_time: None,
                                response_time: Some(event.timestamp),
                                orphan: true,
                            });
                        }
                    }
                }
            }
        }

        entries.sort_by_key(|entry| entry.request_time.or(entry.response_time));

        NetworkTrace {
            version: TRACE_VERSION.to_string(),
            creator: concat!("webgrit/", env!("CARGO_PKG_VERSION")).to_string(),
            exported_at: Utc::now(),
            entries,
        }
    }
}

// ============================================================================
// Recorder task
// ============================================================================

/// Drains a browser event feed into a shared inspector.
///
/// The task runs until the stream ends, which happens when the browser
/// context closes its event channel.
pub fn spawn_recorder(
    mut events: BoxStream<'static, NetworkEvent>,
    inspector: Arc<Mutex<NetworkInspector>>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            // Lock held only for the push.
            if let Ok(mut guard) = inspector.lock() {
                guard.record(event);
            }
        }
        debug!("Network event feed closed");
    })
}

// ============================================================================
// Tests
// ============================================================================
