//! Keyword-based selector resolution.
//!
//! Maps human-friendly keywords like `login_button` to ordered lists of
//! candidate CSS locators. Resolution is a pure table lookup; probing a
//! live page for the first matching candidate is a separate, optional
//! step behind the [`PageQuery`] trait.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use webgrit_core::PageQuery;

use crate::error::SelectorTableError;

// ============================================================================
// Selector Resolver
// ============================================================================

/// Resolves selector keywords to candidate locators.
///
/// Unknown inputs pass through unchanged as a single-element candidate
/// list, so callers can hand any locator string to the same code path.
#[derive(Debug, Clone)]
pub struct SelectorResolver {
    table: BTreeMap<String, Vec<String>>,
}

impl Default for SelectorResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorResolver {
    /// Creates a resolver with the built-in keyword table.
    pub fn new() -> Self {
        let mut table = BTreeMap::new();
        let defaults: &[(&str, &[&str])] = &[
            (
                "login_button",
                &[
                    "button[type='submit']",
                    ".login-btn",
                    "#login",
                    "button:has-text('Login')",
                ],
            ),
            (
                "username",
                &[
                    "input[name='username']",
                    "input[type='email']",
                    "#username",
                    "#email",
                ],
            ),
            (
                "password",
                &["input[name='password']", "input[type='password']", "#password"],
            ),
            (
                "search",
                &[
                    "input[type='search']",
                    "input[name='q']",
                    "#search",
                    ".search-input",
                ],
            ),
            (
                "submit",
                &["button[type='submit']", "input[type='submit']", ".submit-btn"],
            ),
            ("close", &["button.close", ".modal-close", "[aria-label='Close']"]),
            ("menu", &[".menu", "#menu", "nav", ".navigation"]),
            ("link", &["a", "a[href]"]),
            ("image", &["img", "img[src]"]),
            ("form", &["form"]),
        ];
        for (keyword, candidates) in defaults {
            table.insert(
                (*keyword).to_string(),
                candidates.iter().map(|s| (*s).to_string()).collect(),
            );
        }
        Self { table }
    }

    /// Creates a resolver with no keywords; every input passes through.
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Adds or replaces one keyword entry.
    pub fn with_keyword(
        mut self,
        keyword: impl Into<String>,
        candidates: Vec<String>,
    ) -> Self {
        self.table.insert(keyword.into(), candidates);
        self
    }

    /// Extends the built-in table from a JSON file mapping keywords to
    /// candidate lists. File entries override built-in ones.
    pub async fn from_file(path: &Path) -> Result<Self, SelectorTableError> {
        let content = tokio::fs::read_to_string(path).await?;
        let custom: BTreeMap<String, Vec<String>> = serde_json::from_str(&content)?;

        let mut resolver = Self::new();
        info!(path = %path.display(), keywords = custom.len(), "Loaded selector table");
        resolver.table.extend(custom);
        Ok(resolver)
    }

    /// The known keywords, in sorted order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Candidate locators for an input.
    ///
    /// A known keyword yields its candidate list in table order; any
    /// other input is returned as the sole candidate.
    pub fn resolve(&self, input: &str) -> Vec<String> {
        match self.table.get(input) {
            Some(candidates) => candidates.clone(),
            None => vec![input.to_string()],
        }
    }

    /// Probes a page for the first candidate that matches an element.
    pub async fn find_first(&self, input: &str, page: &dyn PageQuery) -> Option<String> {
        for candidate in self.resolve(input) {
            if page.exists(&candidate).await {
                debug!(input, locator = %candidate, "Selector candidate matched");
                return Some(candidate);
            }
        }
        None
    }
}
