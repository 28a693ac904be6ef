//! Login page: credential fields and the submit control.

use crate::error::Result;
use crate::pages::PageActions;

const EMAIL_FIELD: &str = "#email";
const PASSWORD_FIELD: &str = "#password";
const SUBMIT_BUTTON: &str = "[type=submit]";

/// Drives the login form through a borrowed interaction surface. The
/// borrow ties the page object to its session: it cannot outlive it.
pub struct LoginPage<'a, S: PageActions + ?Sized> {
    surface: &'a S,
}

impl<'a, S: PageActions + ?Sized> LoginPage<'a, S> {
    pub fn new(surface: &'a S) -> Self {
        Self { surface }
    }

    /// Fill in both credential fields and submit the form.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        tracing::debug!(email, "submitting login form");
        self.surface.type_text(EMAIL_FIELD, email).await?;
        self.surface.type_text(PASSWORD_FIELD, password).await?;
        self.surface.click(SUBMIT_BUTTON).await
    }

    /// Empty both credential fields, leaving the form ready for the
    /// next attempt.
    pub async fn clear_credentials(&self) -> Result<()> {
        self.surface.clear(EMAIL_FIELD).await?;
        self.surface.clear(PASSWORD_FIELD).await
    }

    /// Text of the inline message the app shows after a failed login.
    pub async fn flash_message(&self) -> Result<String> {
        self.surface.text_of("p").await
    }
}
