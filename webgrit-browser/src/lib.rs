// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Webgrit Browser
//!
//! Browser-session tooling for the Webgrit engine: durable session
//! snapshots, network traffic inspection, and keyword selector
//! resolution.
//!
//! ## Pieces
//!
//! - [`SessionStore`] - saves, loads, lists, and deletes named session
//!   snapshots as JSON files with owner-only permissions
//! - [`restore`] - installs a snapshot's cookies into a live browser,
//!   scoped to the target domain, with optional auto-navigation
//! - [`NetworkInspector`] - accumulates request/response events and
//!   answers summary/export queries over them
//! - [`SelectorResolver`] - maps keywords like `login_button` to
//!   ordered candidate locators, passing unknown inputs through
//!
//! The live browser itself stays behind the
//! [`BrowserSession`](webgrit_core::BrowserSession) trait; this crate
//! never talks to a real browser engine directly.

pub mod error;
pub mod inspector;
pub mod persistence;
pub mod selector;
pub mod store;

pub use error::{SelectorTableError, SessionError};
pub use inspector::{spawn_recorder, NetworkInspector};
pub use persistence::default_session_dir;
pub use selector::SelectorResolver;
pub use store::{restore, RestoreReport, SessionStore};
