//! Capability traits consumed by the orchestration engine.
//!
//! The engine does not implement transport or rendering. It drives two
//! external collaborators through these seams: a raw HTTP transport and
//! a headless browser session. Both are object-safe and mockable.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::models::{CookieRecord, FetchRequest, NetworkEvent, RawResponse};

// ============================================================================
// Transport
// ============================================================================

/// Raw HTTP transport capability.
///
/// Implementations deliver every received response as a [`RawResponse`],
/// including non-2xx statuses; connection-level problems surface as
/// [`ErrorKind`]. The retry loop owns classification and scheduling.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one request attempt.
    async fn request(&self, request: &FetchRequest) -> Result<RawResponse, ErrorKind>;
}

// ============================================================================
// Browser Session
// ============================================================================

/// A command issued against a live browser context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum BrowserCommand {
    /// Navigate to a URL.
    Navigate {
        /// Target URL.
        url: String,
    },
    /// Click the element at a locator.
    Click {
        /// Element locator.
        locator: String,
    },
    /// Fill the input at a locator with a value.
    Fill {
        /// Element locator.
        locator: String,
        /// Value to type.
        value: String,
    },
}

/// Result of a browser command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    /// URL after the command completed.
    pub url: Option<String>,
    /// Page title, when the command produced a navigation.
    pub title: Option<String>,
    /// Navigation response status, when applicable.
    pub status: Option<u16>,
}

/// Headless browser session capability.
///
/// One logical context has a single owner at a time; the engine never
/// multiplexes concurrent mutating commands onto one context.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Executes one command against the context.
    async fn act(&self, command: BrowserCommand) -> Result<ActionResult, ErrorKind>;

    /// Captures all cookies currently held by the context.
    async fn cookies(&self) -> Result<Vec<CookieRecord>, ErrorKind>;

    /// Installs cookies into the context.
    async fn add_cookies(&self, cookies: &[CookieRecord]) -> Result<(), ErrorKind>;

    /// URL the context is currently on, if any page is loaded.
    async fn current_url(&self) -> Option<String>;

    /// Live feed of request/response events for the context's duration.
    fn events(&self) -> BoxStream<'static, NetworkEvent>;
}

// ============================================================================
// Page Query
// ============================================================================

/// Capability to test whether a locator matches anything on the page.
///
/// Kept separate from [`BrowserSession`] so selector resolution stays
/// free of browser-lifetime coupling and independently testable.
#[async_trait]
pub trait PageQuery: Send + Sync {
    /// Returns true if the locator currently matches at least one element.
    async fn exists(&self, locator: &str) -> bool;
}
