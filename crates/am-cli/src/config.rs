//! CLI configuration.
//!
//! Settings are layered: built-in defaults, then the config file, then
//! environment variables and flags (see [`crate::cli::Cli`]).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use am_tree::{ClientConfig, DEFAULT_SESSION_HEADER};
use serde::Deserialize;

use crate::cli::Cli;
use crate::{CliError, CliResult};

/// Exporter configuration.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Service root (e.g., https://am.example.com/am).
    pub base_url: String,

    /// Administrator username.
    pub username: String,

    /// Administrator password. Prompted for when unset.
    pub password: Option<String>,

    /// Header carrying the session token.
    pub session_header: String,

    /// Skip TLS certificate validation.
    pub accept_invalid_certs: bool,

    /// Request timeout in seconds. No timeout when unset.
    pub timeout_secs: Option<u64>,
}

/// Default service root.
fn default_base_url() -> String {
    "http://localhost:8080/am".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: "amadmin".to_string(),
            password: None,
            session_header: DEFAULT_SESSION_HEADER.to_string(),
            accept_invalid_certs: false,
            timeout_secs: None,
        }
    }
}

impl fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("session_header", &self.session_header)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ExportConfig {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// A missing default file yields the defaults; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::config_path()?;
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reads a TOML config file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses TOML configuration.
    pub fn from_toml(content: &str) -> CliResult<Self> {
        toml::from_str(content)
            .map_err(|e| CliError::Config(format!("failed to parse config: {e}")))
    }

    /// Gets the default configuration file path.
    pub fn config_path() -> CliResult<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| CliError::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".am-export").join("config.toml"))
    }

    /// Applies values given on the command line or in the environment.
    #[must_use]
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(username) = &cli.username {
            self.username = username.clone();
        }
        if let Some(password) = &cli.password {
            self.password = Some(password.clone());
        }
        if let Some(header) = &cli.session_header {
            self.session_header = header.clone();
        }
        if cli.insecure {
            self.accept_invalid_certs = true;
        }
        if let Some(timeout) = cli.timeout {
            self.timeout_secs = Some(timeout);
        }
        self
    }

    /// Builds the client settings, using `password` for the session.
    pub fn client_config(&self, password: String) -> CliResult<ClientConfig> {
        if self.session_header.trim().is_empty() {
            return Err(CliError::Config("session_header must not be empty".to_string()));
        }
        if self.timeout_secs == Some(0) {
            return Err(CliError::Config("timeout_secs must be positive".to_string()));
        }

        let mut config = ClientConfig::new(&self.base_url, &self.username, password);
        config.session_header = self.session_header.clone();
        config.accept_invalid_certs = self.accept_invalid_certs;
        config.timeout = self.timeout_secs.map(Duration::from_secs);
        Ok(config)
    }
}
