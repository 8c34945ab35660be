// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Webgrit Fetch
//!
//! Resilient fetching for the Webgrit engine: a pure retry/backoff
//! policy, a bounded-concurrency batch scheduler, and a reqwest-backed
//! transport that tolerates untrusted certificates.
//!
//! ## Pieces
//!
//! - [`RetryPolicy`] - decides retry vs. give-up per failed attempt,
//!   with exponential backoff
//! - [`BatchScheduler`] - runs many requests concurrently under a
//!   limit, index-aligned outcomes, cancellation-aware
//! - [`HttpTransport`] - the [`Transport`](webgrit_core::Transport)
//!   implementation (SSL verification off by default)
//! - [`FetchSettings`] - explicit transport configuration
//!
//! ## Example
//!
//! ```ignore
//! use webgrit_fetch::{BatchScheduler, HttpTransport};
//! use webgrit_core::FetchRequest;
//! use tokio_util::sync::CancellationToken;
//! use std::sync::Arc;
//!
//! let transport = Arc::new(HttpTransport::new()?);
//! let scheduler = BatchScheduler::new(transport);
//! let outcomes = scheduler
//!     .run_batch(requests, 4, CancellationToken::new())
//!     .await?;
//! ```

pub mod batch;
pub mod client;
pub mod error;
pub mod retry;
pub mod settings;

pub use batch::{fetch_with_retry, BatchScheduler};
pub use client::{classify_error, HttpTransport};
pub use error::ConfigError;
pub use retry::{RetryDecision, RetryPolicy};
pub use settings::FetchSettings;
