//! HTTP responses returned by the client.

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;

/// A completed HTTP response.
///
/// The body is kept as text so that it can be logged, decoded as JSON, or
/// handed to the page aggregator without re-reading the connection.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: String,
}

impl Response {
    /// Create a response with no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as untyped JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Decode the body into a typed value.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// The body decoded for logging; `null` when the body is not JSON.
    pub(crate) fn decoded_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_helpers() {
        let response = Response::new(200, r#"{"data":[{"id":"A1"}]}"#);
        assert!(response.is_success());
        assert_eq!(response.json().unwrap()["data"][0]["id"], "A1");

        #[derive(serde::Deserialize)]
        struct Body {
            data: Vec<Value>,
        }
        let body: Body = response.json_as().unwrap();
        assert_eq!(body.data.len(), 1);
    }

    #[test]
    fn test_decoded_body_of_non_json() {
        let response = Response::new(204, "");
        assert_eq!(response.decoded_body(), Value::Null);
        assert!(response.json().is_err());
    }
}
