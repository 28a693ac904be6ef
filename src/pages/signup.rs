//! Signup page: the registration form for new users.

use crate::error::Result;
use crate::fixture::FixtureRecord;
use crate::pages::PageActions;

const FIRST_NAME_FIELD: &str = "#firstName";
const LAST_NAME_FIELD: &str = "#lastName";
const EMAIL_FIELD: &str = "#email";
const PASSWORD_FIELD: &str = "#password";
const PHONE_FIELD: &str = "#phoneNumber";
const ADDRESS_FIELD: &str = "#address";
const GENDER_RADIO: &str = "[type=radio]";
const SUBMIT_BUTTON: &str = "[type=submit]";

/// Drives the registration form through a borrowed interaction surface.
pub struct SignupPage<'a, S: PageActions + ?Sized> {
    surface: &'a S,
}

impl<'a, S: PageActions + ?Sized> SignupPage<'a, S> {
    pub fn new(surface: &'a S) -> Self {
        Self { surface }
    }

    /// Fill the whole form from `record` and submit it.
    ///
    /// Every field is written, in form order. Absent optional fields
    /// are typed as the empty string so the interaction sequence is
    /// identical whether or not they are present.
    pub async fn signup(&self, record: &FixtureRecord) -> Result<()> {
        tracing::debug!(email = %record.email, "submitting signup form");
        self.surface
            .type_text(FIRST_NAME_FIELD, &record.first_name)
            .await?;
        self.surface
            .type_text(LAST_NAME_FIELD, record.last_name.as_deref().unwrap_or(""))
            .await?;
        self.surface.type_text(EMAIL_FIELD, &record.email).await?;
        self.surface
            .type_text(PASSWORD_FIELD, &record.password)
            .await?;
        self.surface
            .type_text(PHONE_FIELD, &record.phone_number)
            .await?;
        self.surface
            .type_text(ADDRESS_FIELD, record.address.as_deref().unwrap_or(""))
            .await?;
        // First radio in the group; the form only needs one picked.
        self.surface.click(GENDER_RADIO).await?;
        self.surface.click(SUBMIT_BUTTON).await
    }
}
