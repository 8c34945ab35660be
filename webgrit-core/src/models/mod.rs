//! Domain models shared across the Webgrit crates.

pub mod network;
pub mod request;
pub mod session;

pub use network::{Direction, NetworkEvent, NetworkSummary, NetworkTrace, TraceEntry};
pub use request::{
    FetchOutcome, FetchRequest, Method, RawResponse, DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_BASE_DELAY, DEFAULT_TIMEOUT,
};
pub use session::{CookieRecord, Session, SessionSummary};
