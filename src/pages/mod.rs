//! Page objects: typed wrappers over the pages the harness drives.

use async_trait::async_trait;

use crate::error::Result;

pub mod login;
pub mod signup;

pub use login::LoginPage;
pub use signup::SignupPage;

/// The interaction surface page objects are written against.
///
/// Page objects never hold a browser themselves; they borrow anything
/// that can locate an element by CSS selector and act on it. The live
/// implementation is a browser session, tests substitute a recorder.
#[async_trait]
pub trait PageActions: Send + Sync {
    /// Focus the element at `selector` and type `text` into it.
    async fn type_text(&self, selector: &str, text: &str) -> Result<()>;

    /// Click the element at `selector`.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Visible text of the element at `selector`.
    async fn text_of(&self, selector: &str) -> Result<String>;

    /// Empty the value of the input at `selector`.
    async fn clear(&self, selector: &str) -> Result<()>;
}
