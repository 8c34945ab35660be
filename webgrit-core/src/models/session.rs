//! Session and cookie models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Cookie Record
// ============================================================================

/// One cookie captured from a browser context.
///
/// `domain` is the partition key: at restore time a cookie is installed
/// only when its domain matches the target host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Domain the cookie belongs to (may carry a leading dot).
    pub domain: String,
    /// Path scope.
    #[serde(default = "default_path")]
    pub path: String,
    /// Expiry, absent for session cookies.
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
    /// Secure flag.
    #[serde(default)]
    pub secure: bool,
    /// HttpOnly flag.
    #[serde(default)]
    pub http_only: bool,
}

fn default_path() -> String {
    "/".to_string()
}

impl CookieRecord {
    /// Creates a cookie with default path and flags.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: default_path(),
            expiry: None,
            secure: false,
            http_only: false,
        }
    }

    /// Returns true if this cookie may be installed for `host`.
    ///
    /// The cookie domain must equal the host or be a parent suffix of it:
    /// a cookie for `example.com` (or `.example.com`) matches both
    /// `example.com` and `a.example.com`, but never `notexample.com`.
    pub fn matches_host(&self, host: &str) -> bool {
        let domain = self.domain.trim_start_matches('.');
        if domain.is_empty() {
            return false;
        }
        host == domain || host.ends_with(&format!(".{domain}"))
    }
}

// ============================================================================
// Session
// ============================================================================

/// A named snapshot of cookie-based authentication state.
///
/// The persisted store owns sessions; in-memory values are disposable
/// snapshots. Wire format (camelCase) round-trips losslessly through
/// save and load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session name.
    pub name: String,
    /// Captured cookies, in capture order.
    pub cookies: Vec<CookieRecord>,
    /// When the session was saved.
    pub saved_at: DateTime<Utc>,
    /// Last URL the browser context was on, if any.
    #[serde(default)]
    pub last_url: Option<String>,
}

impl Session {
    /// Creates a session stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        cookies: Vec<CookieRecord>,
        last_url: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            cookies,
            saved_at: Utc::now(),
            last_url,
        }
    }

    /// Returns the distinct cookie domains, sorted.
    pub fn domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self
            .cookies
            .iter()
            .map(|c| c.domain.trim_start_matches('.').to_string())
            .collect();
        domains.sort();
        domains.dedup();
        domains
    }

    /// Produces a listing summary for this session.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            name: self.name.clone(),
            cookie_count: self.cookies.len(),
            domains: self.domains(),
            saved_at: self.saved_at,
            last_url: self.last_url.clone(),
        }
    }
}

/// Summary of a stored session, for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session name.
    pub name: String,
    /// Number of cookies in the session.
    pub cookie_count: usize,
    /// Distinct cookie domains.
    pub domains: Vec<String>,
    /// When the session was saved.
    pub saved_at: DateTime<Utc>,
    /// Last URL the browser context was on, if any.
    pub last_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_matching() {
        let cookie = CookieRecord::new("sid", "abc", "example.com");
        assert!(cookie.matches_host("example.com"));
        assert!(cookie.matches_host("login.example.com"));
        assert!(!cookie.matches_host("notexample.com"));
        assert!(!cookie.matches_host("example.com.evil.org"));

        let dotted = CookieRecord::new("sid", "abc", ".example.com");
        assert!(dotted.matches_host("example.com"));
        assert!(dotted.matches_host("a.b.example.com"));

        let empty = CookieRecord::new("sid", "abc", "");
        assert!(!empty.matches_host("example.com"));
    }

    #[test]
    fn test_session_domains_deduplicated() {
        let session = Session::new(
            "work",
            vec![
                CookieRecord::new("a", "1", ".example.com"),
                CookieRecord::new("b", "2", "example.com"),
                CookieRecord::new("c", "3", "other.com"),
            ],
            None,
        );
        assert_eq!(session.domains(), vec!["example.com", "other.com"]);
        assert_eq!(session.summary().cookie_count, 3);
    }

    #[test]
    fn test_session_wire_format() {
        let session = Session::new(
            "default",
            vec![CookieRecord::new("sid", "abc", "a.com")],
            Some("https://a.com/home".into()),
        );
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("savedAt").is_some());
        assert_eq!(json["lastUrl"], "https://a.com/home");
        assert_eq!(json["cookies"][0]["httpOnly"], false);

        let back: Session = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }
}
