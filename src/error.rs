//! Error taxonomy for the harness.

use std::path::PathBuf;

use thiserror::Error;

/// Failure classes surfaced by the harness. Every variant carries enough
/// context to diagnose the failure from the message alone.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file missing, unreadable, or malformed.
    #[error("config error: {0}")]
    Config(String),

    /// A backend name outside the supported set was requested.
    #[error("unsupported backend {0:?} (supported: chrome, chromium)")]
    UnsupportedBackend(String),

    /// A session operation was requested while no session is active.
    #[error("no active browser session; call init_driver first")]
    SessionAbsent,

    /// A second session was requested while one is already active.
    #[error("a browser session is already active; call quit_driver first")]
    SessionActive,

    /// The browser process could not be located or launched.
    #[error("failed to launch {backend}: {message}")]
    Launch { backend: String, message: String },

    /// The fixture log could not be read, parsed, or written.
    #[error("fixture log {path:?}: {message}")]
    FixtureLog { path: PathBuf, message: String },

    /// A read was attempted against a fixture log with no records.
    #[error("fixture log {path:?} holds no records")]
    EmptyFixtureLog { path: PathBuf },

    /// An element never appeared within the implicit wait window.
    #[error("element {selector:?} not found after {waited_ms} ms")]
    ElementNotFound { selector: String, waited_ms: u64 },

    /// A page-level browser command failed mid-interaction.
    #[error("browser command failed: {0}")]
    Browser(String),
}

pub type Result<T> = std::result::Result<T, Error>;
