//! Named session persistence and restore.
//!
//! Loading a session and applying it to a live browser context are two
//! deliberately separate operations. [`SessionStore::load`] only reads
//! data; [`restore`] mutates the context. Collapsing the two was a
//! recurring source of confusion in earlier tooling, so a failure in
//! one can never corrupt the other.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use url::Url;

use webgrit_core::{BrowserCommand, BrowserSession, CookieRecord, Session, SessionSummary};

use crate::error::SessionError;
use crate::persistence::{self, default_session_dir};

// ============================================================================
// Session Store
// ============================================================================

/// Durable store of named sessions, one JSON file per name.
///
/// `save` replaces any prior session under the same name atomically.
/// The directory is explicit configuration; the store holds no
/// process-wide state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Creates a store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store at the platform default location.
    pub fn open_default() -> Self {
        Self::new(default_session_dir())
    }

    /// The directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, SessionError> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return Err(SessionError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Saves a session, overwriting any prior one with the same name.
    #[instrument(skip(self, cookies), fields(cookies = cookies.len()))]
    pub async fn save(
        &self,
        name: &str,
        cookies: Vec<CookieRecord>,
        last_url: Option<String>,
    ) -> Result<Session, SessionError> {
        let path = self.path_for(name)?;
        let session = Session::new(name, cookies, last_url);

        persistence::save_json(&path, &session).await?;

        info!(
            name,
            cookies = session.cookies.len(),
            domains = session.domains().len(),
            "Session saved"
        );
        Ok(session)
    }

    /// Captures the browser context's current state and saves it.
    pub async fn capture(
        &self,
        name: &str,
        browser: &dyn BrowserSession,
    ) -> Result<Session, SessionError> {
        let cookies = browser.cookies().await?;
        let last_url = browser.current_url().await;
        self.save(name, cookies, last_url).await
    }

    /// Loads a session by name.
    ///
    /// Returns the stored value only; nothing is applied to any browser
    /// context. Use [`restore`] for that.
    pub async fn load(&self, name: &str) -> Result<Session, SessionError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(SessionError::NotFound(name.to_string()));
        }
        let session: Session = persistence::load_json(&path).await?;
        debug!(name, cookies = session.cookies.len(), "Session loaded");
        Ok(session)
    }

    /// Lists summaries of all stored sessions, sorted by name.
    pub async fn list(&self) -> Result<Vec<SessionSummary>, SessionError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match persistence::load_json::<Session>(&path).await {
                Ok(session) => summaries.push(session.summary()),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable session file");
                }
            }
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    /// Deletes a session. Returns false if none existed.
    pub async fn delete(&self, name: &str) -> Result<bool, SessionError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(false);
        }
        tokio::fs::remove_file(&path).await?;
        info!(name, "Session deleted");
        Ok(true)
    }
}

// ============================================================================
// Restore
// ============================================================================

/// What a restore actually did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreReport {
    /// Cookies installed into the context.
    pub installed: usize,
    /// Cookies skipped by domain scoping.
    pub skipped: usize,
    /// URL navigated to, when auto-navigation was requested and ran.
    pub navigated: Option<String>,
}

/// Applies a loaded session to a live browser context.
///
/// Only cookies whose domain matches the target host are installed;
/// the rest are silently skipped. The target host comes from the
/// session's `last_url` when present, otherwise from the context's
/// current URL; with no target host at all, every cookie is skipped.
///
/// With `auto_navigate`, the context is driven to the session's
/// `last_url` after the cookies land. Without it, the caller navigates
/// manually; the session is inert until they do.
#[instrument(skip(session, browser), fields(session = %session.name))]
pub async fn restore(
    session: &Session,
    browser: &dyn BrowserSession,
    auto_navigate: bool,
) -> Result<RestoreReport, SessionError> {
    let target = match &session.last_url {
        Some(url) => Some(url.clone()),
        None => browser.current_url().await,
    };
    let host = target
        .as_deref()
        .and_then(|u| Url::parse(u).ok())
        .and_then(|u| u.host_str().map(str::to_string));

    let (eligible, skipped): (Vec<_>, Vec<_>) = session
        .cookies
        .iter()
        .cloned()
        .partition(|cookie| host.as_deref().is_some_and(|h| cookie.matches_host(h)));

    if !eligible.is_empty() {
        browser.add_cookies(&eligible).await?;
    }

    info!(
        installed = eligible.len(),
        skipped = skipped.len(),
        "Session cookies applied"
    );

    let mut navigated = None;
    if auto_navigate {
        if let Some(url) = &session.last_url {
            browser
                .act(BrowserCommand::Navigate { url: url.clone() })
                .await?;
            debug!(url = %url, "Auto-navigated to saved URL");
            navigated = Some(url.clone());
        }
    }

    Ok(RestoreReport {
        installed: eligible.len(),
        skipped: skipped.len(),
        navigated,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::stream::{self, BoxStream, StreamExt};
    use std::sync::Mutex;
    use webgrit_core::{ActionResult, ErrorKind, NetworkEvent};

    /// Browser mock recording installed cookies and commands.
    #[derive(Default)]
    struct MockBrowser {
        url: Option<String>,
        installed: Mutex<Vec<CookieRecord>>,
        commands: Mutex<Vec<BrowserCommand>>,
    }

    impl MockBrowser {
        fn at(url: &str) -> Self {
            Self {
                url: Some(url.to_string()),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl BrowserSession for MockBrowser {
        async fn act(&self, command: BrowserCommand) -> Result<ActionResult, ErrorKind> {
            let url = match &command {
                BrowserCommand::Navigate { url } => Some(url.clone()),
                _ => self.url.clone(),
            };
            self.commands.lock().unwrap().push(command);
            Ok(ActionResult {
                url,
                ..ActionResult::default()
            })
        }

        async fn cookies(&self) -> Result<Vec<CookieRecord>, ErrorKind> {
            Ok(self.installed.lock().unwrap().clone())
        }

        async fn add_cookies(&self, cookies: &[CookieRecord]) -> Result<(), ErrorKind> {
            self.installed.lock().unwrap().extend_from_slice(cookies);
            Ok(())
        }

        async fn current_url(&self) -> Option<String> {
            self.url.clone()
        }

        fn events(&self) -> BoxStream<'static, NetworkEvent> {
            stream::empty().boxed()
        }
    }

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let (_dir, store) = store();
        let cookies = vec![
            CookieRecord::new("sid", "abc", "a.com"),
            CookieRecord::new("csrf", "xyz", ".a.com"),
        ];

        let saved = store
            .save("work", cookies.clone(), Some("https://a.com/inbox".into()))
            .await
            .unwrap();
        let loaded = store.load("work").await.unwrap();

        assert_eq!(loaded, saved);
        assert_eq!(loaded.cookies, cookies);
        assert_eq!(loaded.last_url.as_deref(), Some("https://a.com/inbox"));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous() {
        let (_dir, store) = store();
        store
            .save("s", vec![CookieRecord::new("old", "1", "a.com")], None)
            .await
            .unwrap();
        store
            .save("s", vec![CookieRecord::new("new", "2", "b.com")], None)
            .await
            .unwrap();

        let loaded = store.load("s").await.unwrap();
        assert_eq!(loaded.cookies.len(), 1);
        assert_eq!(loaded.cookies[0].name, "new");
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(
            store.load("ghost").await,
            Err(SessionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_names_rejected() {
        let (_dir, store) = store();
        for name in ["", "../escape", "a/b", "a\\b"] {
            assert!(
                matches!(store.load(name).await, Err(SessionError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let (_dir, store) = store();
        store
            .save("beta", vec![CookieRecord::new("a", "1", "b.com")], None)
            .await
            .unwrap();
        store
            .save("alpha", vec![], Some("https://a.com".into()))
            .await
            .unwrap();

        let summaries = store.list().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "alpha");
        assert_eq!(summaries[1].name, "beta");
        assert_eq!(summaries[1].cookie_count, 1);

        assert!(store.delete("alpha").await.unwrap());
        assert!(!store.delete("alpha").await.unwrap());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_capture_reads_browser_state() {
        let (_dir, store) = store();
        let browser = MockBrowser::at("https://a.com/dash");
        browser
            .add_cookies(&[CookieRecord::new("sid", "abc", "a.com")])
            .await
            .unwrap();

        let session = store.capture("grabbed", &browser).await.unwrap();
        assert_eq!(session.cookies.len(), 1);
        assert_eq!(session.last_url.as_deref(), Some("https://a.com/dash"));
    }

    #[tokio::test]
    async fn test_restore_installs_only_matching_domains() {
        let session = Session::new(
            "mixed",
            vec![
                CookieRecord::new("keep", "1", "a.com"),
                CookieRecord::new("keep2", "2", ".a.com"),
                CookieRecord::new("drop", "3", "b.com"),
            ],
            Some("https://login.a.com/home".into()),
        );
        let browser = MockBrowser::default();

        let report = restore(&session, &browser, false).await.unwrap();

        assert_eq!(report.installed, 2);
        assert_eq!(report.skipped, 1);
        assert!(report.navigated.is_none());
        let installed = browser.installed.lock().unwrap();
        assert!(installed.iter().all(|c| c.domain.contains("a.com")));
    }

    #[tokio::test]
    async fn test_restore_foreign_domain_installs_nothing() {
        let session = Session::new(
            "foreign",
            vec![CookieRecord::new("sid", "1", "a.com")],
            None,
        );
        let browser = MockBrowser::at("https://b.com/");

        let report = restore(&session, &browser, false).await.unwrap();

        assert_eq!(report.installed, 0);
        assert_eq!(report.skipped, 1);
        assert!(browser.installed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_restore_manual_path_does_not_navigate() {
        let session = Session::new(
            "manual",
            vec![CookieRecord::new("sid", "1", "a.com")],
            Some("https://a.com/inbox".into()),
        );
        let browser = MockBrowser::default();

        restore(&session, &browser, false).await.unwrap();
        assert!(browser.commands.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_restore_auto_navigate_drives_browser() {
        let session = Session::new(
            "auto",
            vec![CookieRecord::new("sid", "1", "a.com")],
            Some("https://a.com/inbox".into()),
        );
        let browser = MockBrowser::default();

        let report = restore(&session, &browser, true).await.unwrap();

        assert_eq!(report.navigated.as_deref(), Some("https://a.com/inbox"));
        let commands = browser.commands.lock().unwrap();
        assert_eq!(
            commands.as_slice(),
            &[BrowserCommand::Navigate {
                url: "https://a.com/inbox".into()
            }]
        );
    }
}
