use std::collections::HashMap;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

/// Config file read when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "roadtest.conf";

/// Fixture log location used when the config file does not name one.
pub const DEFAULT_FIXTURES_FILE: &str = "fixtures/users.json";

/// Immutable snapshot of the run configuration.
///
/// Loaded exactly once at startup and handed by reference to everything
/// that needs it. A missing file, an unparseable line, or a missing
/// `baseUrl` aborts the run before any browser is launched.
#[derive(Debug, Clone)]
pub struct Config {
    values: HashMap<String, String>,
    base_url: Url,
}

impl Config {
    /// Read and parse the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), message_of(e))))
    }

    /// Parse config text. Lines are `key=value`; blank lines and lines
    /// starting with `#` are skipped. Later keys override earlier ones.
    fn parse(content: &str) -> Result<Self> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::Config(format!(
                    "line {} is not key=value: {:?}",
                    idx + 1,
                    line
                )));
            };
            values.insert(key.trim().to_string(), value.trim().to_string());
        }

        let raw = values
            .get("baseUrl")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Config("missing required key baseUrl".into()))?;
        let base_url = Url::parse(raw)
            .map_err(|e| Error::Config(format!("baseUrl {:?} is not a valid URL: {}", raw, e)))?;

        Ok(Self { values, base_url })
    }

    /// Raw lookup by key. `None` when the key is absent from the file.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Application URL all runs start from.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Requested browser backend name, if the file sets one.
    pub fn browser(&self) -> Option<&str> {
        self.get("browser").filter(|v| !v.is_empty())
    }

    /// Fixture log path, falling back to [`DEFAULT_FIXTURES_FILE`].
    pub fn fixtures_file(&self) -> PathBuf {
        self.get("fixturesFile")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURES_FILE))
    }
}

/// Strip the class prefix so load() can re-wrap with the file path.
fn message_of(err: Error) -> String {
    match err {
        Error::Config(msg) => msg,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roadtest.conf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_browser_and_base_url() {
        let (_dir, path) = write_config("browser=chrome\nbaseUrl=http://localhost:8000/\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.browser(), Some("chrome"));
        assert_eq!(config.base_url().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let (_dir, path) =
            write_config("# environment under test\n\nbaseUrl=http://example.com\n\n# end\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url().as_str(), "http://example.com/");
        assert_eq!(config.browser(), None);
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let (_dir, path) = write_config("baseUrl=http://example.com/?next=/home\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url().query(), Some("next=/home"));
    }

    #[test]
    fn trims_whitespace_around_key_and_value() {
        let (_dir, path) = write_config("  browser = chromium \nbaseUrl=http://example.com\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.browser(), Some("chromium"));
    }

    #[test]
    fn later_key_overrides_earlier() {
        let (_dir, path) =
            write_config("browser=chrome\nbrowser=chromium\nbaseUrl=http://example.com\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.browser(), Some("chromium"));
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.conf")).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {err:?}");
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let (_dir, path) = write_config("baseUrl=http://example.com\nnot a pair\n");
        let err = Config::load(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "got {msg:?}");
    }

    #[test]
    fn missing_base_url_is_fatal() {
        let (_dir, path) = write_config("browser=chrome\n");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("baseUrl"), "got {err:?}");
    }

    #[test]
    fn invalid_base_url_is_fatal() {
        let (_dir, path) = write_config("baseUrl=not a url\n");
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn fixtures_file_defaults_when_unset() {
        let (_dir, path) = write_config("baseUrl=http://example.com\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.fixtures_file(), PathBuf::from(DEFAULT_FIXTURES_FILE));
    }

    #[test]
    fn fixtures_file_honours_override() {
        let (_dir, path) =
            write_config("baseUrl=http://example.com\nfixturesFile=/tmp/alt.json\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.fixtures_file(), PathBuf::from("/tmp/alt.json"));
    }

    #[test]
    fn get_returns_raw_values() {
        let (_dir, path) = write_config("baseUrl=http://example.com\nteam=qa\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.get("team"), Some("qa"));
        assert_eq!(config.get("missing"), None);
    }
}
