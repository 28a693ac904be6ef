//! Browser session lifecycle: launch, interaction surface, teardown.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::pages::PageActions;

/// How long element lookups keep polling before giving up.
pub const IMPLICIT_WAIT: Duration = Duration::from_secs(30);

/// Delay between lookup attempts inside the implicit wait window.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Window size applied when running headless, where maximizing is moot.
const HEADLESS_WINDOW: (u32, u32) = (1920, 1080);

/// How long teardown waits for the event loop to drain after close.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Overrides executable discovery with an explicit browser binary.
pub const ENV_BROWSER_PATH: &str = "ROADTEST_BROWSER_PATH";

/// Set to `1`, `true`, or `yes` to run with a visible browser window.
pub const ENV_HEADED: &str = "ROADTEST_HEADED";

/// The closed set of supported browser backends.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString, strum::VariantArray,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Backend {
    #[default]
    Chrome,
    Chromium,
}

impl Backend {
    /// Map a configured backend name onto the supported set. `None`,
    /// empty, and whitespace-only all mean the default; anything else
    /// must match a variant (case-insensitively) or the run aborts.
    pub fn resolve(name: Option<&str>) -> Result<Self> {
        let name = name.map(str::trim).unwrap_or("");
        if name.is_empty() {
            return Ok(Self::default());
        }
        name.parse()
            .map_err(|_| Error::UnsupportedBackend(name.to_string()))
    }

    /// Locate the backend's executable. An explicit path from
    /// [`ENV_BROWSER_PATH`] wins; otherwise the usual binary names are
    /// tried on `PATH`.
    pub fn executable(self) -> Result<PathBuf> {
        if let Ok(raw) = std::env::var(ENV_BROWSER_PATH) {
            let raw = raw.trim();
            if !raw.is_empty() {
                let path = PathBuf::from(raw);
                if path.exists() {
                    return Ok(path);
                }
                return Err(Error::Launch {
                    backend: self.to_string(),
                    message: format!("{} points at missing file {}", ENV_BROWSER_PATH, raw),
                });
            }
        }
        for candidate in self.candidates() {
            if let Ok(path) = which::which(candidate) {
                return Ok(path);
            }
        }
        Err(Error::Launch {
            backend: self.to_string(),
            message: format!(
                "no executable found on PATH (tried: {})",
                self.candidates().join(", ")
            ),
        })
    }

    fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::Chrome => &["google-chrome", "google-chrome-stable", "chrome"],
            Self::Chromium => &["chromium", "chromium-browser"],
        }
    }
}

/// One live browser plus the page every interaction goes through.
///
/// Sessions are only handed out by [`DriverManager`], which guarantees
/// at most one exists per run.
#[derive(Debug)]
pub struct Session {
    backend: Backend,
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    implicit_wait: Duration,
}

impl Session {
    async fn launch(backend: Backend, headed: bool) -> Result<Self> {
        let executable = backend.executable()?;
        tracing::debug!(
            backend = %backend,
            executable = %executable.display(),
            headed,
            "launching browser"
        );

        let mut builder = BrowserConfig::builder()
            .chrome_executable(&executable)
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .viewport(None);
        if headed {
            builder = builder.with_head().arg("--start-maximized");
        } else {
            builder = builder.window_size(HEADLESS_WINDOW.0, HEADLESS_WINDOW.1);
        }
        let config = builder.build().map_err(|message| Error::Launch {
            backend: backend.to_string(),
            message,
        })?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| Error::Launch {
            backend: backend.to_string(),
            message: format!("cannot launch process: {}", e),
        })?;

        // The CDP connection stalls unless its event stream is drained.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let mut browser = browser;
                let _ = browser.close().await;
                handler.abort();
                return Err(Error::Launch {
                    backend: backend.to_string(),
                    message: format!("cannot open initial page: {}", e),
                });
            }
        };

        Ok(Self {
            backend,
            browser,
            page,
            handler,
            implicit_wait: IMPLICIT_WAIT,
        })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Navigate the session's page.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| Error::Browser(format!("navigate to {}: {}", url, e)))?;
        Ok(())
    }

    /// URL the page currently shows.
    pub async fn current_url(&self) -> Result<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| Error::Browser(format!("read current url: {}", e)))?;
        Ok(url.unwrap_or_default())
    }

    /// Look up `selector`, polling until it appears or the implicit
    /// wait window runs out.
    async fn find(&self, selector: &str) -> Result<Element> {
        let deadline = Instant::now() + self.implicit_wait;
        loop {
            match self.page.find_element(selector).await {
                Ok(element) => return Ok(element),
                Err(_) if Instant::now() < deadline => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(_) => {
                    return Err(Error::ElementNotFound {
                        selector: selector.to_string(),
                        waited_ms: self.implicit_wait.as_millis() as u64,
                    });
                }
            }
        }
    }

    /// Tear the session down, logging failures instead of surfacing
    /// them: a broken browser must still release the run.
    async fn shutdown(mut self) {
        if let Err(e) = self.page.close().await {
            tracing::warn!(error = %e, "page close failed");
        }
        match self.browser.close().await {
            Ok(_) => {
                // Closing ends the event stream; give it a moment to drain.
                if tokio::time::timeout(SHUTDOWN_GRACE, &mut self.handler)
                    .await
                    .is_err()
                {
                    self.handler.abort();
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "browser close failed, aborting event loop");
                self.handler.abort();
            }
        }
        tracing::info!(backend = %self.backend, "browser session ended");
    }
}

#[async_trait]
impl PageActions for Session {
    async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        let element = self.find(selector).await?;
        element
            .click()
            .await
            .map_err(|e| Error::Browser(format!("focus {:?}: {}", selector, e)))?;
        element
            .type_str(text)
            .await
            .map_err(|e| Error::Browser(format!("type into {:?}: {}", selector, e)))?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self.find(selector).await?;
        element
            .click()
            .await
            .map_err(|e| Error::Browser(format!("click {:?}: {}", selector, e)))?;
        Ok(())
    }

    async fn text_of(&self, selector: &str) -> Result<String> {
        let element = self.find(selector).await?;
        let text = element
            .inner_text()
            .await
            .map_err(|e| Error::Browser(format!("read text of {:?}: {}", selector, e)))?;
        Ok(text.unwrap_or_default())
    }

    async fn clear(&self, selector: &str) -> Result<()> {
        let element = self.find(selector).await?;
        element
            .call_js_fn("function() { this.value = ''; }", false)
            .await
            .map_err(|e| Error::Browser(format!("clear {:?}: {}", selector, e)))?;
        Ok(())
    }
}

/// Owner of the run's single browser session.
///
/// The session slot moves between exactly two states: absent and
/// active. Requesting a second session, or quitting when none exists,
/// is a bug in the calling test and fails loudly rather than being
/// papered over.
#[derive(Default)]
pub struct DriverManager {
    active: Option<Session>,
}

impl DriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Borrow the active session, failing if none has been started.
    pub fn session(&self) -> Result<&Session> {
        self.active.as_ref().ok_or(Error::SessionAbsent)
    }

    /// Launch a browser for `backend_name` and make it the active
    /// session. Fails if a session is already active; on launch failure
    /// the slot stays absent, so a retry is possible.
    pub async fn init_driver(&mut self, backend_name: Option<&str>) -> Result<&Session> {
        if self.active.is_some() {
            return Err(Error::SessionActive);
        }
        let backend = Backend::resolve(backend_name)?;
        let session = Session::launch(backend, headed_requested()).await?;
        tracing::info!(backend = %backend, "browser session started");
        Ok(self.active.insert(session))
    }

    /// Quit and discard the active session. Teardown is unconditional:
    /// a session that fails to close cleanly is logged and dropped, and
    /// the slot is absent either way.
    pub async fn quit_driver(&mut self) -> Result<()> {
        let session = self.active.take().ok_or(Error::SessionAbsent)?;
        session.shutdown().await;
        Ok(())
    }
}

fn headed_requested() -> bool {
    std::env::var(ENV_HEADED)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_defaults_to_chrome() {
        assert_eq!(Backend::resolve(None).unwrap(), Backend::Chrome);
        assert_eq!(Backend::resolve(Some("")).unwrap(), Backend::Chrome);
        assert_eq!(Backend::resolve(Some("   ")).unwrap(), Backend::Chrome);
    }

    #[test]
    fn resolve_is_case_insensitive() {
        assert_eq!(Backend::resolve(Some("Chrome")).unwrap(), Backend::Chrome);
        assert_eq!(Backend::resolve(Some("CHROMIUM")).unwrap(), Backend::Chromium);
        assert_eq!(Backend::resolve(Some(" chromium ")).unwrap(), Backend::Chromium);
    }

    #[test]
    fn resolve_rejects_unknown_backends() {
        for name in ["firefox", "safari", "edge", "opera"] {
            let err = Backend::resolve(Some(name)).unwrap_err();
            match err {
                Error::UnsupportedBackend(got) => assert_eq!(got, name),
                other => panic!("expected UnsupportedBackend, got {other:?}"),
            }
        }
    }

    #[test]
    fn backend_displays_as_lowercase_name() {
        assert_eq!(Backend::Chrome.to_string(), "chrome");
        assert_eq!(Backend::Chromium.to_string(), "chromium");
    }

    #[test]
    fn manager_starts_with_no_session() {
        let manager = DriverManager::new();
        assert!(!manager.is_active());
        assert!(matches!(manager.session(), Err(Error::SessionAbsent)));
    }

    #[tokio::test]
    async fn quit_without_session_fails_loudly() {
        let mut manager = DriverManager::new();
        let err = manager.quit_driver().await.unwrap_err();
        assert!(matches!(err, Error::SessionAbsent), "got {err:?}");
    }

    #[tokio::test]
    async fn init_with_unsupported_backend_leaves_slot_absent() {
        let mut manager = DriverManager::new();
        let err = manager.init_driver(Some("firefox")).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedBackend(_)), "got {err:?}");
        assert!(!manager.is_active());
    }
}
