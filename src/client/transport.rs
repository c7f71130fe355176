//! HTTP transport seam and its reqwest implementation.
//!
//! [`ApiClient`](crate::ApiClient) never talks to the network directly. On
//! first use it asks its [`Connector`] for a [`Transport`] bound to the
//! base URL of the resolved environment and keeps it for the rest of its
//! life.

use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use reqwest::Method;
use std::time::Duration;
use url::Url;

use crate::client::config::ConnectionConfig;
use crate::models::{Params, Response};
use crate::{Error, Result};

/// A request ready to be put on the wire.
#[derive(Debug, Clone, Copy)]
pub struct OutgoingRequest<'a> {
    /// HTTP method
    pub method: &'a Method,
    /// Path relative to the base URL
    pub path: &'a str,
    /// JSON body; empty bodies are not sent
    pub body: &'a Params,
    /// Query arguments, `client_id` included
    pub query: &'a Params,
}

/// Executes requests against one base URL.
///
/// Implementations return [`Error::ClientRequest`] for 4xx responses so the
/// client can tell them apart from other failures.
pub trait Transport: Send {
    /// Send a request and wait for the complete response.
    fn send(&self, request: &OutgoingRequest<'_>) -> Result<Response>;
}

/// Builds a [`Transport`] for a set of connection settings.
pub trait Connector: Send {
    /// Create the transport.
    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Transport>>;
}

/// Connector producing [`ReqwestTransport`]s.
#[derive(Debug, Clone)]
pub struct ReqwestConnector {
    user_agent: String,
}

impl ReqwestConnector {
    /// Create a connector sending the given User-Agent.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl Connector for ReqwestConnector {
    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Transport>> {
        let transport = ReqwestTransport::new(config.base_url()?, &self.user_agent)?;
        Ok(Box::new(transport))
    }
}

/// Blocking reqwest transport.
///
/// Redirects are not followed and no timeout is set: a call waits for as
/// long as the server takes.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: HttpClient,
    base_url: Url,
}

impl ReqwestTransport {
    /// Build a transport resolving request paths against `base_url`.
    pub fn new(base_url: Url, user_agent: &str) -> Result<Self> {
        let http = HttpClient::builder()
            .redirect(Policy::none())
            .timeout(None::<Duration>)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { http, base_url })
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request path against the base URL.
    ///
    /// Relative paths extend the base path (`orders` under `/v1/` becomes
    /// `/v1/orders`); absolute paths replace it.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &OutgoingRequest<'_>) -> Result<Response> {
        let url = self.url_for(request.path)?;

        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .query(&request.query.to_query_pairs());
        if !request.body.is_empty() {
            builder = builder.json(request.body);
        }

        let response = builder.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text()?;

        if status.is_client_error() || status.is_server_error() {
            return Err(Error::from_status(
                status.as_u16(),
                request.method.as_str(),
                url.as_str(),
                body,
            ));
        }

        Ok(Response {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}
