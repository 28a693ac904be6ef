//! Run orchestration: session bring-up, shared flows, teardown.

use crate::config::Config;
use crate::driver::{DriverManager, Session};
use crate::error::Result;
use crate::fixture::{FixtureRecord, FixtureStore};
use crate::pages::{LoginPage, PageActions, SignupPage};

/// Link from the login page over to the registration form.
const REGISTER_LINK: &str = "a[href*='register']";

/// One test run: a loaded config plus the single browser session that
/// serves it. Constructed at the top of a run, finished at the bottom,
/// whatever happened in between.
pub struct TestRun {
    config: Config,
    driver: DriverManager,
}

impl TestRun {
    /// Launch the configured backend and open the app's base URL.
    ///
    /// If navigation fails the session is quit before the error is
    /// returned, so a failed start never leaks a browser.
    pub async fn start(config: Config) -> Result<Self> {
        let mut driver = DriverManager::new();
        driver.init_driver(config.browser()).await?;
        let mut run = Self { config, driver };
        if let Err(e) = run.open_base().await {
            let _ = run.driver.quit_driver().await;
            return Err(e);
        }
        Ok(run)
    }

    async fn open_base(&self) -> Result<()> {
        self.session()?.goto(self.config.base_url().as_str()).await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The run's browser session.
    pub fn session(&self) -> Result<&Session> {
        self.driver.session()
    }

    /// Quit the browser and end the run. Call this on every path out
    /// of a scenario, pass or fail.
    pub async fn finish(mut self) -> Result<()> {
        self.driver.quit_driver().await
    }
}

/// Walk the signup flow for `record` and append it to the fixture log.
/// Returns the record for follow-up assertions.
pub async fn register_user(
    run: &TestRun,
    store: &FixtureStore,
    record: FixtureRecord,
) -> Result<FixtureRecord> {
    let session = run.session()?;
    session.click(REGISTER_LINK).await?;
    SignupPage::new(session).signup(&record).await?;
    store.append(&record)?;
    tracing::info!(email = %record.email, "registered user stored in fixture log");
    Ok(record)
}

/// Log in as the most recently registered user in the fixture log.
pub async fn login_latest(run: &TestRun, store: &FixtureStore) -> Result<FixtureRecord> {
    let record = store.read_last()?;
    let session = run.session()?;
    LoginPage::new(session)
        .login(&record.email, &record.password)
        .await?;
    tracing::info!(email = %record.email, "logged in as last stored user");
    Ok(record)
}

/// Log in with explicit credentials, stored or not.
pub async fn login_as(run: &TestRun, email: &str, password: &str) -> Result<()> {
    let session = run.session()?;
    LoginPage::new(session).login(email, password).await
}
