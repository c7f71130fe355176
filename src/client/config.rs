//! Client configuration and per-environment connection settings.

use once_cell::unsync::OnceCell;
use serde::Deserialize;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use url::Url;

use crate::models::Environment;
use crate::{Error, Result};

/// Connection settings shipped with the crate.
const BUNDLED_CONFIG: &str = include_str!("../../config/config.toml");

/// Configuration for the marketplace client.
///
/// # Example
///
/// ```
/// use mpapi_client::{ClientConfig, ConfigSource};
///
/// let config = ClientConfig::default()
///     .with_user_agent("my-shop/1.0")
///     .with_config_source(ConfigSource::Inline(
///         "[test]\nurl = \"http://localhost:8080/v1/\"".to_string(),
///     ));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User-Agent header value
    pub user_agent: String,
    /// Where per-environment connection settings come from
    pub config_source: ConfigSource,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("mpapi-client/{} (Rust)", env!("CARGO_PKG_VERSION")),
            config_source: ConfigSource::Bundled,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the source of connection settings.
    pub fn with_config_source(mut self, source: ConfigSource) -> Self {
        self.config_source = source;
        self
    }
}

/// Where the per-environment connection table is read from.
///
/// The table is TOML keyed by environment tag:
///
/// ```toml
/// [test]
/// url = "https://test-mpapi.mallgroup.com/v1/"
///
/// [prod]
/// url = "https://mpapi.mallgroup.com/v1/"
/// ```
#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    /// The table bundled with the crate.
    #[default]
    Bundled,
    /// A TOML file. A missing file yields an empty table.
    File(PathBuf),
    /// TOML text.
    Inline(String),
}

impl ConfigSource {
    fn load(&self) -> Result<HashMap<String, ConnectionConfig>> {
        match self {
            ConfigSource::Bundled => parse_table(BUNDLED_CONFIG),
            ConfigSource::Inline(text) => parse_table(text),
            ConfigSource::File(path) => match std::fs::read_to_string(path) {
                Ok(text) => parse_table(&text),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "config file not found");
                    Ok(HashMap::new())
                }
                Err(err) => Err(Error::Config(format!(
                    "failed to read {}: {}",
                    path.display(),
                    err
                ))),
            },
        }
    }
}

fn parse_table(text: &str) -> Result<HashMap<String, ConnectionConfig>> {
    toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
}

/// Connection settings for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL every request path is resolved against.
    pub url: String,
}

impl ConnectionConfig {
    /// Create connection settings for a base URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Parse the base URL.
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.url)?)
    }
}

/// Lazily loaded lookup from environment to [`ConnectionConfig`].
///
/// The table is read on the first lookup and kept for the lifetime of the
/// store. There is no reload.
#[derive(Debug)]
pub struct ConfigStore {
    source: ConfigSource,
    entries: OnceCell<HashMap<String, ConnectionConfig>>,
}

impl ConfigStore {
    /// Create a store that will read from `source` on first use.
    pub fn new(source: ConfigSource) -> Self {
        Self {
            source,
            entries: OnceCell::new(),
        }
    }

    /// Look up the settings of an environment.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigMissing`] if the table has no entry for `env`.
    /// - [`Error::Config`] if the table cannot be read or parsed.
    pub fn lookup(&self, env: Environment) -> Result<&ConnectionConfig> {
        self.load()?
            .get(env.as_str())
            .ok_or(Error::ConfigMissing(env))
    }

    /// Look up the settings of an environment given by its tag.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownEnvironment`] if the tag is not an allowed
    /// environment, otherwise as [`lookup`](Self::lookup).
    pub fn lookup_tag(&self, tag: &str) -> Result<&ConnectionConfig> {
        let env: Environment = tag.parse()?;
        self.lookup(env)
    }

    /// Returns `true` once the table has been read.
    pub fn is_loaded(&self) -> bool {
        self.entries.get().is_some()
    }

    fn load(&self) -> Result<&HashMap<String, ConnectionConfig>> {
        self.entries.get_or_try_init(|| {
            let entries = self.source.load()?;
            tracing::debug!(environments = entries.len(), "loaded connection config");
            Ok(entries)
        })
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(ConfigSource::Bundled)
    }
}
