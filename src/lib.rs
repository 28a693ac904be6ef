pub mod config;
pub mod driver;
pub mod error;
pub mod fixture;
pub mod logging;
pub mod pages;
pub mod scenario;
pub mod testdata;

// Re-export the types a scenario touches at crate root for convenience
pub use config::Config;
pub use driver::{Backend, DriverManager, Session};
pub use error::{Error, Result};
pub use fixture::{FixtureRecord, FixtureStore};
pub use pages::{LoginPage, PageActions, SignupPage};
pub use scenario::TestRun;
