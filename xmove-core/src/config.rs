//! Connection settings for the Studio instance.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `XMOVE_*` environment variables (a `.env` file is read first when
//! present).

use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";
pub const DEFAULT_XBLOCK_URL_ROOT: &str = "/xblock";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const ENV_PREFIX: &str = "XMOVE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Scheme, host and port of Studio
    pub base_url: String,
    /// Path prefix of the xblock handler
    pub xblock_url_root: String,
    pub request_timeout_secs: u64,
    /// Bearer token sent with every request
    pub auth_token: Option<String>,
    /// Open the dialog at the source's current parent instead of the root
    pub start_at_source_parent: bool,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            xblock_url_root: DEFAULT_XBLOCK_URL_ROOT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            auth_token: None,
            start_at_source_parent: false,
        }
    }
}

impl StudioConfig {
    /// Load from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load with an explicit environment source.
    pub fn load_with_env(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, ConfigError> {
        let defaults = StudioConfig::default();
        let mut builder = config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("xblock_url_root", defaults.xblock_url_root)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("start_at_source_parent", false)?;

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let loaded: StudioConfig = builder
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;
        loaded.validate()?;

        tracing::debug!(
            target: "xmove::config",
            base_url = %loaded.base_url,
            xblock_url_root = %loaded.xblock_url_root,
            "configuration loaded"
        );
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.base_url).map_err(|err| {
            ConfigError::InvalidBaseUrl {
                value: self.base_url.clone(),
                reason: err.to_string(),
            }
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                value: self.base_url.clone(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
