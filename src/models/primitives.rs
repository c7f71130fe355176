//! Primitive types for the marketplace API.
//!
//! This module provides the client identifier and the environment enum.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A marketplace client identifier.
///
/// The identifier authenticates every request and encodes the environment
/// the client belongs to. It is kept as a secret so that `Debug` output of
/// the client never prints it.
///
/// # Example
///
/// ```
/// use mpapi_client::ClientId;
///
/// let id = ClientId::new("test_a1b2c3").unwrap();
/// assert_eq!(id.expose(), "test_a1b2c3");
/// assert!(ClientId::new("").is_err());
/// ```
pub struct ClientId(SecretString);

impl ClientId {
    /// Create a client identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidClientId`] if the identifier is empty.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::InvalidClientId("client id is missing".to_string()));
        }
        Ok(Self(SecretString::from(id)))
    }

    /// Get the raw identifier.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientId([REDACTED])")
    }
}

impl TryFrom<&str> for ClientId {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ClientId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

/// Deployment target of the marketplace API.
///
/// Determines which base URL requests are sent to. The wire tags are
/// `test` and `prod`, matching the prefix of the client identifier and the
/// table names of the connection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    /// Testing environment.
    #[default]
    Test,
    /// Production environment.
    Production,
}

impl Environment {
    /// All environments the client accepts.
    pub const ALLOWED: [Environment; 2] = [Environment::Test, Environment::Production];

    /// The tag used in client identifiers and configuration tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Test => "test",
            Environment::Production => "prod",
        }
    }

    /// Returns `true` if this is the production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Returns `true` if this is the test environment.
    pub fn is_test(&self) -> bool {
        matches!(self, Environment::Test)
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        Environment::ALLOWED
            .into_iter()
            .find(|env| env.as_str() == tag)
            .ok_or_else(|| Error::UnknownEnvironment(tag.to_string()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
