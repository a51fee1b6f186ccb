//! Client settings.
//!
//! Layered with the `config` crate, later sources overriding earlier ones:
//! 1. built-in defaults
//! 2. a TOML file, by default `docforge/config.toml` in the platform
//!    config directory (`~/.config` on Linux)
//! 3. `DOCFORGE_*` environment variables, e.g. `DOCFORGE_BACKEND_URL`

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use url::Url;

/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

const ENV_PREFIX: &str = "DOCFORGE";

/// Error type for loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// The backend URL is not an absolute http(s) URL.
    #[error("invalid backend_url {url:?}: {reason}")]
    InvalidBackendUrl {
        /// The configured value
        url: String,
        /// What is wrong with it
        reason: String,
    },

    /// A timeout of zero seconds was configured.
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Settings for talking to the documentation backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Backend origin, without the `/api/v1` suffix
    pub backend_url: String,
    /// Timeout for ordinary backend calls, including uploads
    pub request_timeout_secs: u64,
    /// Timeout for endpoint tests relayed by the backend
    pub test_timeout_secs: u64,
    /// Timeout for analytics calls
    pub analytics_timeout_secs: u64,
    /// User-Agent sent with every call
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: 600,
            test_timeout_secs: 1000,
            analytics_timeout_secs: 30,
            user_agent: concat!("docforge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Settings {
    /// Default location of the settings file.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("docforge").join("config.toml"))
    }

    /// Loads settings from defaults, a settings file and the environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    ///
    /// # Errors
    /// Returns an error if a source cannot be parsed or a value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, None)
    }

    /// Like [`Self::load`], reading variables from `env` instead of the
    /// process environment when given.
    ///
    /// # Errors
    /// Returns an error if a source cannot be parsed or a value is invalid.
    pub fn load_from(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("backend_url", defaults.backend_url)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("test_timeout_secs", defaults.test_timeout_secs)?
            .set_default("analytics_timeout_secs", defaults.analytics_timeout_secs)?
            .set_default("user_agent", defaults.user_agent)?;

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                if let Some(path) = Self::default_path() {
                    builder = builder.add_source(
                        File::from(path.as_path())
                            .format(FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        let settings: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;
        settings.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        let url = Url::parse(&self.backend_url).map_err(|e| ConfigError::InvalidBackendUrl {
            url: self.backend_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBackendUrl {
                url: self.backend_url,
                reason: "scheme must be http or https".to_string(),
            });
        }
        for (name, value) in [
            ("request_timeout_secs", self.request_timeout_secs),
            ("test_timeout_secs", self.test_timeout_secs),
            ("analytics_timeout_secs", self.analytics_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroTimeout(name));
            }
        }
        self.backend_url = self.backend_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Base URL of the versioned backend API.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/api/v1", self.backend_url.trim_end_matches('/'))
    }

    /// Timeout for ordinary backend calls.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Timeout for endpoint tests.
    #[must_use]
    pub const fn test_timeout(&self) -> Duration {
        Duration::from_secs(self.test_timeout_secs)
    }

    /// Timeout for analytics calls.
    #[must_use]
    pub const fn analytics_timeout(&self) -> Duration {
        Duration::from_secs(self.analytics_timeout_secs)
    }
}
