// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Webgrit Core
//!
//! Core types, models, and capability traits for the Webgrit engine.
//!
//! This crate provides the foundational abstractions used across the other
//! Webgrit crates:
//!
//! - Fetch models ([`FetchRequest`], [`FetchOutcome`], [`RawResponse`])
//! - Session models ([`Session`], [`CookieRecord`], [`SessionSummary`])
//! - Network observation models ([`NetworkEvent`], [`NetworkTrace`],
//!   [`NetworkSummary`])
//! - The closed failure taxonomy ([`ErrorKind`])
//! - Capability traits for the external collaborators the engine drives:
//!   [`Transport`] and [`BrowserSession`], plus [`PageQuery`] for
//!   selector probing

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::ErrorKind;

// Re-export all model types
pub use models::{
    // Session types
    CookieRecord,
    // Network types
    Direction,
    // Fetch types
    FetchOutcome,
    FetchRequest,
    Method,
    NetworkEvent,
    NetworkSummary,
    NetworkTrace,
    RawResponse,
    Session,
    SessionSummary,
    TraceEntry,
};

// Re-export traits
pub use traits::{ActionResult, BrowserCommand, BrowserSession, PageQuery, Transport};
