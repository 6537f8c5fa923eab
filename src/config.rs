// Connection settings for the deployment server.
//
// `ClientConfig` is what the HTTP client is built from. `Settings` is the
// optional `~/.actopus.json` file the CLI reads defaults from; command line
// flags and environment variables take precedence over it.

use crate::error::{ActopusError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed client identifier sent as the user agent.
pub const USER_AGENT: &str = "actopus";

/// Name of the settings file in the user's home directory.
pub const SETTINGS_FILE: &str = ".actopus.json";

/// Requests are bounded by this unless configured otherwise.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything needed to talk to one server.
#[derive(Clone)]
pub struct ClientConfig {
    /// Server host name, also sent as the `Host` header.
    pub host: String,
    pub api_key: String,
    /// Overrides the `https://<host>/api` default.
    pub base_url: Option<String>,
    pub timeout: Duration,
    /// Skip TLS certificate validation. Off unless explicitly requested.
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            accept_invalid_certs: false,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disable certificate validation. This is insecure and only meant for
    /// servers with self-signed certificates.
    pub fn with_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// API root every endpoint path is appended to, without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}/api", self.host),
        }
    }
}

// Keep the API key out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

/// Contents of the optional settings file. Every field may be omitted.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub insecure: bool,
}

impl Settings {
    /// Default location: `~/.actopus.json`, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(SETTINGS_FILE))
    }

    /// Load settings from `path`. A missing file yields empty settings.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| {
            ActopusError::Config(format!("invalid settings file {}: {}", path.display(), e))
        })
    }

    /// Load settings from the default location.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url_uses_https_and_api_root() {
        let config = ClientConfig::new("octopus.example.com", "API-KEY");
        assert_eq!(config.base_url(), "https://octopus.example.com/api");
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let config = ClientConfig::new("h", "k").with_base_url("http://127.0.0.1:9000/api/");
        assert_eq!(config.base_url(), "http://127.0.0.1:9000/api");
    }

    #[test]
    fn debug_hides_api_key() {
        let config = ClientConfig::new("h", "API-SECRET");
        let out = format!("{:?}", config);
        assert!(!out.contains("API-SECRET"));
        assert!(out.contains("<redacted>"));
    }

    #[test]
    fn missing_settings_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn reads_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(
            &path,
            r#"{"server": "octo.local", "api_key": "API-1", "timeout_secs": 5, "insecure": true}"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.server.as_deref(), Some("octo.local"));
        assert_eq!(settings.api_key.as_deref(), Some("API-1"));
        assert_eq!(settings.timeout_secs, Some(5));
        assert!(settings.insecure);
        assert!(settings.base_url.is_none());
    }

    #[test]
    fn rejects_unknown_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{"sever": "typo"}"#).unwrap();
        assert!(matches!(Settings::load_from(&path), Err(ActopusError::Config(_))));
    }
}
