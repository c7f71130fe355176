//! Error types for the marketplace API client.
//!
//! Every failure surfaces to the caller through [`Error`]. Logging is an
//! observability side channel and never replaces returning the error.

use serde_json::Value;
use thiserror::Error;

use crate::models::Environment;

/// A specialized `Result` type for marketplace API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all marketplace API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The client identifier is empty or does not follow `<env>_<key>`.
    #[error("Invalid client id: {0}")]
    InvalidClientId(String),

    /// The client identifier names an environment outside the allowed set.
    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    /// No connection settings exist for a recognized environment.
    #[error("Missing configuration for environment: {0}")]
    ConfigMissing(Environment),

    /// The API answered with a 4xx status.
    #[error("Client error: `{method} {url}` resulted in a `{status}` response")]
    ClientRequest {
        /// HTTP status code
        status: u16,
        /// Request method
        method: String,
        /// Fully resolved request URL
        url: String,
        /// Raw response body
        body: String,
    },

    /// A replay was attempted before any request was sent.
    #[error("No prior request to repeat")]
    NoPriorRequest,

    /// The API answered with a non-success status other than 4xx.
    #[error("API error: status={status}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns `true` if this error indicates a client-side issue
    /// (4xx response, bad identifier, invalid input).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::ClientRequest { .. }
                | Error::InvalidClientId(_)
                | Error::UnknownEnvironment(_)
                | Error::InvalidInput(_)
        )
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ClientRequest { status, .. } | Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Decode the response body attached to a status error as JSON.
    ///
    /// Returns `None` when the error carries no body or the body is not JSON.
    pub fn body_json(&self) -> Option<Value> {
        match self {
            Error::ClientRequest { body, .. } | Error::Api { body, .. } => {
                serde_json::from_str(body).ok()
            }
            _ => None,
        }
    }

    /// Build the error for a non-success status.
    pub(crate) fn from_status(status: u16, method: &str, url: &str, body: String) -> Self {
        if (400..500).contains(&status) {
            Error::ClientRequest {
                status,
                method: method.to_string(),
                url: url.to_string(),
                body,
            }
        } else {
            Error::Api { status, body }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classifies_4xx() {
        let err = Error::from_status(404, "GET", "https://example.test/v1/orders", String::new());
        assert!(matches!(err, Error::ClientRequest { status: 404, .. }));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_from_status_passes_through_5xx() {
        let err = Error::from_status(503, "GET", "https://example.test/v1/orders", "down".into());
        assert!(matches!(err, Error::Api { status: 503, .. }));
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_client_request_message() {
        let err = Error::from_status(400, "POST", "https://example.test/v1/products", String::new());
        assert_eq!(
            err.to_string(),
            "Client error: `POST https://example.test/v1/products` resulted in a `400` response"
        );
    }

    #[test]
    fn test_body_json() {
        let err = Error::from_status(
            422,
            "PUT",
            "https://example.test/v1/products/1",
            r#"{"errors":["title missing"]}"#.into(),
        );
        let body = err.body_json().unwrap();
        assert_eq!(body["errors"][0], "title missing");
        assert!(Error::NoPriorRequest.body_json().is_none());
    }

    #[test]
    fn test_config_missing_display() {
        let err = Error::ConfigMissing(Environment::Production);
        assert_eq!(err.to_string(), "Missing configuration for environment: prod");
    }
}
