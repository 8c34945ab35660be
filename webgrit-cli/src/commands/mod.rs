//! CLI command implementations.

pub mod batch;
pub mod fetch;
pub mod selectors;
pub mod sessions;
pub mod trace;

use anyhow::{bail, Result};
use std::time::Duration;
use webgrit_core::{FetchRequest, Method};
use webgrit_fetch::{FetchSettings, HttpTransport};

/// Transport options shared by the fetch and batch commands.
#[derive(clap::Args)]
pub struct TransportArgs {
    /// Verify TLS certificates (off by default, matching tolerant mode).
    #[arg(long)]
    pub verify_ssl: bool,

    /// Proxy URL for all requests.
    #[arg(long)]
    pub proxy: Option<String>,

    /// User-Agent header override.
    #[arg(long)]
    pub user_agent: Option<String>,
}

/// Request shaping options shared by the fetch and batch commands.
#[derive(clap::Args)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, DELETE, HEAD).
    #[arg(long, short, default_value = "GET")]
    pub method: String,

    /// Request header, as "Name: value". Repeatable.
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// Request body.
    #[arg(long)]
    pub body: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Retry budget for transient failures.
    #[arg(long, default_value = "3")]
    pub retries: u32,

    /// Base backoff delay in milliseconds (doubles per attempt).
    #[arg(long, default_value = "1000")]
    pub retry_delay: u64,
}

impl TransportArgs {
    /// Builds the configured transport.
    pub fn build_transport(&self) -> Result<HttpTransport> {
        let mut settings = FetchSettings::default().with_verify_ssl(self.verify_ssl);
        if let Some(proxy) = &self.proxy {
            settings = settings.with_proxy(proxy.clone());
        }
        if let Some(user_agent) = &self.user_agent {
            settings = settings.with_user_agent(user_agent.clone());
        }
        Ok(HttpTransport::with_settings(&settings)?)
    }
}

impl RequestArgs {
    /// Builds a request for one URL from these options.
    pub fn build_request(&self, url: &str) -> Result<FetchRequest> {
        let method = parse_method(&self.method)?;
        let mut request = FetchRequest::new(method, url)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_retries(self.retries, Duration::from_millis(self.retry_delay));

        for header in &self.headers {
            let Some((name, value)) = header.split_once(':') else {
                bail!("invalid header (expected \"Name: value\"): {header}");
            };
            request = request.with_header(name.trim(), value.trim());
        }

        if let Some(body) = &self.body {
            request = request.with_body(body.clone());
        }

        Ok(request)
    }
}

fn parse_method(input: &str) -> Result<Method> {
    match input.to_uppercase().as_str() {
        "GET" => Ok(Method::Get),
        "POST" => Ok(Method::Post),
        "PUT" => Ok(Method::Put),
        "DELETE" => Ok(Method::Delete),
        "HEAD" => Ok(Method::Head),
        other => bail!("unsupported method: {other}"),
    }
}
