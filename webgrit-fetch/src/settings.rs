//! Transport settings.

use std::time::Duration;

use webgrit_core::models::DEFAULT_TIMEOUT;

/// Browser-like default User-Agent, matching what target sites expect.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Settings for the HTTP transport.
///
/// Passed explicitly at construction; the transport holds no
/// process-wide state. Certificate verification is off by default:
/// tolerating self-signed, expired, and mismatched certificates is the
/// point of this engine.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Verify TLS certificates. Off by default.
    pub verify_ssl: bool,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Optional proxy URL applied to all requests.
    pub proxy: Option<String>,
    /// Connect timeout for the underlying client.
    pub connect_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            verify_ssl: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            connect_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl FetchSettings {
    /// Settings with certificate verification enabled.
    pub fn verified() -> Self {
        Self {
            verify_ssl: true,
            ..Self::default()
        }
    }

    /// Sets certificate verification.
    pub fn with_verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Sets the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets a proxy for all requests.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}
