//! The reqwest-backed [`Transport`] implementation.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use webgrit_core::{ErrorKind, FetchRequest, Method, RawResponse, Transport};

use crate::error::ConfigError;
use crate::settings::FetchSettings;

/// HTTP transport tolerant of untrusted certificates.
///
/// Delivers every received response, whatever the status; the retry
/// loop owns success/failure classification. Connection-level problems
/// are classified into the [`ErrorKind`] taxonomy here.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Client,
}

impl HttpTransport {
    /// Creates a transport with default settings (SSL verification off).
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_settings(&FetchSettings::default())
    }

    /// Creates a transport from explicit settings.
    pub fn with_settings(settings: &FetchSettings) -> Result<Self, ConfigError> {
        if !settings.verify_ssl {
            warn!("TLS certificate verification disabled");
        }

        let mut builder = Client::builder()
            .danger_accept_invalid_certs(!settings.verify_ssl)
            .user_agent(settings.user_agent.clone())
            .connect_timeout(settings.connect_timeout);

        if let Some(proxy) = &settings.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| ConfigError::ClientBuild(format!("invalid proxy: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let inner = builder
            .build()
            .map_err(|e| ConfigError::ClientBuild(e.to_string()))?;

        Ok(Self { inner })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: &FetchRequest) -> Result<RawResponse, ErrorKind> {
        debug!(url = %request.url, method = %request.method, "Sending request");

        let mut builder = match request.method {
            Method::Get => self.inner.get(&request.url),
            Method::Post => self.inner.post(&request.url),
            Method::Put => self.inner.put(&request.url),
            Method::Delete => self.inner.delete(&request.url),
            Method::Head => self.inner.head(&request.url),
        }
        .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(classify_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let body = response.text().await.map_err(classify_error)?;

        debug!(url = %final_url, status, bytes = body.len(), "Response received");

        Ok(RawResponse {
            status,
            final_url,
            headers,
            body,
        })
    }
}

/// Maps a reqwest error onto the closed failure taxonomy.
///
/// reqwest does not expose TLS failures as a distinct category, so
/// connection errors are inspected via their source chain for
/// certificate/handshake wording before falling back to `Network`.
pub fn classify_error(error: reqwest::Error) -> ErrorKind {
    if error.is_timeout() {
        return ErrorKind::Timeout;
    }
    if error.is_decode() || error.is_body() {
        return ErrorKind::Parse(error.to_string());
    }

    let chain = error_chain_text(&error);
    if error.is_connect() && mentions_tls(&chain) {
        return ErrorKind::Ssl(chain);
    }
    ErrorKind::Network(chain)
}

fn error_chain_text(error: &reqwest::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = std::error::Error::source(error);
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}

fn mentions_tls(text: &str) -> bool {
    let lower = text.to_lowercase();
    ["certificate", "tls", "ssl", "handshake"]
        .iter()
        .any(|needle| lower.contains(needle))
}
