//! Fetch request and outcome models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::ErrorKind;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum retries on transient failures.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay for exponential backoff.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

// ============================================================================
// Method
// ============================================================================

/// HTTP method for a fetch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// HTTP GET.
    #[default]
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
    /// HTTP HEAD.
    Head,
}

impl Method {
    /// Returns the canonical uppercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Fetch Request
// ============================================================================

/// One logical fetch operation.
///
/// Immutable once submitted to the batch scheduler. Retry behavior is
/// carried on the request itself so a batch can mix policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    /// Target URL.
    pub url: String,
    /// HTTP method.
    #[serde(default)]
    pub method: Method,
    /// Extra request headers, in insertion order.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Optional request body.
    #[serde(default)]
    pub body: Option<String>,
    /// Per-attempt deadline.
    pub timeout: Duration,
    /// Maximum retries on transient failures (attempts = retries + 1).
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries.
    pub retry_base_delay: Duration,
}

impl FetchRequest {
    /// Creates a GET request with default timeout and retry settings.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Creates a request with default timeout and retry settings.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the per-attempt deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry budget and backoff base.
    pub fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_base_delay = base_delay;
        self
    }
}

// ============================================================================
// Raw Response
// ============================================================================

/// Response delivered by a [`Transport`](crate::traits::Transport).
///
/// The transport reports every received response here, including non-2xx
/// statuses; classification into success or failure happens in the retry
/// loop that owns the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// URL after any redirects.
    pub final_url: String,
    /// Response headers, in wire order.
    pub headers: Vec<(String, String)>,
    /// Decoded response body.
    pub body: String,
}

impl RawResponse {
    /// Returns true for 2xx and 3xx statuses.
    pub fn is_success(&self) -> bool {
        self.status < 400
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ErrorKind> {
        serde_json::from_str(&self.body).map_err(|e| ErrorKind::Parse(e.to_string()))
    }
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// Terminal result of one fetch operation, produced exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum FetchOutcome {
    /// The fetch produced a non-error response.
    #[serde(rename_all = "camelCase")]
    Success {
        /// HTTP status code.
        status: u16,
        /// Response headers.
        headers: Vec<(String, String)>,
        /// Response body.
        body: String,
        /// Attempts made, including the successful one.
        attempts: u32,
    },
    /// The fetch failed permanently.
    #[serde(rename_all = "camelCase")]
    Failure {
        /// Failure classification.
        kind: ErrorKind,
        /// Human-readable detail.
        message: String,
        /// Attempts made before giving up.
        attempts: u32,
    },
}

impl FetchOutcome {
    /// Creates a success outcome from a raw response.
    pub fn success(response: RawResponse, attempts: u32) -> Self {
        Self::Success {
            status: response.status,
            headers: response.headers,
            body: response.body,
            attempts,
        }
    }

    /// Creates a failure outcome with the kind's display as message.
    pub fn failure(kind: ErrorKind, attempts: u32) -> Self {
        let message = kind.to_string();
        Self::Failure {
            kind,
            message,
            attempts,
        }
    }

    /// Creates a failure outcome with a custom message.
    pub fn failure_with_message(kind: ErrorKind, message: impl Into<String>, attempts: u32) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
            attempts,
        }
    }

    /// Creates a cancelled outcome.
    pub fn cancelled(attempts: u32) -> Self {
        Self::failure(ErrorKind::Cancelled, attempts)
    }

    /// Returns true if the operation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the attempt count.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } | Self::Failure { attempts, .. } => *attempts,
        }
    }

    /// Returns the failure kind, if any.
    pub fn error_kind(&self) -> Option<&ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(kind),
        }
    }
}
