//! The marketplace API client.

use once_cell::unsync::OnceCell;
use reqwest::Method;
use serde_json::{json, Value};

use crate::client::config::{ClientConfig, ConfigStore};
use crate::client::environment::EnvironmentResolver;
use crate::client::logger::{Logger, TracingLogger};
use crate::client::paginated::PageAggregator;
use crate::client::transport::{Connector, OutgoingRequest, ReqwestConnector, Transport};
use crate::models::{ClientId, Environment, Params, Response};
use crate::{Error, Result};

/// Query argument carrying the client identifier.
pub const CLIENT_ID_ARG: &str = "client_id";

/// Callback receiving every error the client returns.
pub type ErrorHandler = Box<dyn FnMut(&Error) + Send>;

/// The last top-level request sent by an [`ApiClient`].
///
/// Replays re-send this request with extra query arguments; they never
/// replace it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSnapshot {
    path: String,
    method: Method,
    body: Params,
    query_args: Params,
}

impl RequestSnapshot {
    /// Request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// JSON body
    pub fn body(&self) -> &Params {
        &self.body
    }

    /// Query arguments as given by the caller, without `client_id`.
    pub fn query_args(&self) -> &Params {
        &self.query_args
    }
}

/// Blocking client for the marketplace API.
///
/// Every request carries the client identifier as the `client_id` query
/// argument. The base URL comes from the environment encoded in the
/// identifier; the transport for it is created on the first request and
/// reused afterwards.
///
/// A client is meant to be used from one thread at a time.
///
/// # Example
///
/// ```no_run
/// use mpapi_client::{ApiClient, Method, Params};
///
/// # fn example() -> mpapi_client::Result<()> {
/// let mut client = ApiClient::new("test_4f0c2a")?;
///
/// let response = client.send_request("products", Method::GET, Params::new(), Params::new())?;
/// println!("{}", response.body);
///
/// // Every page of a paged listing, concatenated
/// let orders = client.fetch_all("orders", Method::GET, Params::new(), Params::new())?;
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    client_id: ClientId,
    environment: Environment,
    config_store: ConfigStore,
    connector: Box<dyn Connector>,
    transport: OnceCell<Box<dyn Transport>>,
    logger: OnceCell<Box<dyn Logger>>,
    error_handler: Option<ErrorHandler>,
    last_request: Option<RequestSnapshot>,
}

impl ApiClient {
    /// Create a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidClientId`] if `client_id` is empty. The
    /// identifier's format is only checked when the first request is sent.
    pub fn new(client_id: impl Into<String>) -> Result<Self> {
        Self::with_config(client_id, ClientConfig::default())
    }

    /// Create a client with a custom configuration.
    pub fn with_config(client_id: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let connector = ReqwestConnector::new(config.user_agent.clone());
        Self::with_connector(client_id, config, connector)
    }

    /// Create a client that builds its transport with `connector`.
    pub fn with_connector(
        client_id: impl Into<String>,
        config: ClientConfig,
        connector: impl Connector + 'static,
    ) -> Result<Self> {
        let client_id = ClientId::new(client_id)?;

        Ok(Self {
            client_id,
            environment: Environment::Test,
            config_store: ConfigStore::new(config.config_source),
            connector: Box::new(connector),
            transport: OnceCell::new(),
            logger: OnceCell::new(),
            error_handler: None,
            last_request: None,
        })
    }

    /// Replace the logger.
    pub fn set_logger(&mut self, logger: impl Logger + 'static) -> &mut Self {
        let logger: Box<dyn Logger> = Box::new(logger);
        self.logger = OnceCell::with_value(logger);
        self
    }

    /// Get the active logger, creating the default one if none was set.
    pub fn logger(&self) -> &dyn Logger {
        &**self
            .logger
            .get_or_init(|| Box::new(TracingLogger) as Box<dyn Logger>)
    }

    /// Install a callback that sees every error returned by
    /// [`send_request`](Self::send_request) and
    /// [`repeat_last_request`](Self::repeat_last_request).
    ///
    /// The error is still returned to the caller.
    pub fn set_error_handler(&mut self, handler: impl FnMut(&Error) + Send + 'static) -> &mut Self {
        self.error_handler = Some(Box::new(handler));
        self
    }

    /// The client identifier.
    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// The environment stored at construction.
    ///
    /// This is always [`Environment::Test`]. Requests are routed by the
    /// environment encoded in the client identifier, not by this value.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// The last top-level request, if any.
    pub fn last_request(&self) -> Option<&RequestSnapshot> {
        self.last_request.as_ref()
    }

    /// Send a request.
    ///
    /// The request becomes the new replay snapshot. `client_id` is added to
    /// the query and cannot be overridden by `query_args`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidClientId`] / [`Error::UnknownEnvironment`] if the
    ///   identifier does not resolve to an environment.
    /// - [`Error::ConfigMissing`] if that environment has no settings.
    /// - [`Error::ClientRequest`] on a 4xx response.
    /// - Any other transport failure, unchanged.
    pub fn send_request(
        &mut self,
        path: &str,
        method: Method,
        body: Params,
        query_args: Params,
    ) -> Result<Response> {
        let snapshot = RequestSnapshot {
            path: path.to_string(),
            method,
            body,
            query_args,
        };
        let result = self.execute(&snapshot, &snapshot.query_args);
        self.last_request = Some(snapshot);
        self.report(result)
    }

    /// Re-send the last top-level request with `extra_args` laid over its
    /// query arguments.
    ///
    /// Each replay merges onto the original arguments; the snapshot is left
    /// as it was.
    ///
    /// # Errors
    ///
    /// [`Error::NoPriorRequest`] if nothing was sent yet, otherwise as
    /// [`send_request`](Self::send_request).
    pub fn repeat_last_request(&mut self, extra_args: Params) -> Result<Response> {
        let result = match &self.last_request {
            Some(snapshot) => {
                let query_args = snapshot.query_args.merged(&extra_args);
                self.execute(snapshot, &query_args)
            }
            None => Err(Error::NoPriorRequest),
        };
        self.report(result)
    }

    /// Send a request and collect every page of the response.
    ///
    /// Non-paged responses yield their `data` field unchanged; paged ones
    /// yield the concatenation of all pages' `data` arrays.
    pub fn fetch_all(
        &mut self,
        path: &str,
        method: Method,
        body: Params,
        query_args: Params,
    ) -> Result<Value> {
        let response = self.send_request(path, method, body, query_args)?;
        PageAggregator::collect(self, &response)
    }

    fn execute(&self, request: &RequestSnapshot, query_args: &Params) -> Result<Response> {
        let method = &request.method;
        let path = request.path.as_str();

        self.logger()
            .info(&format!("Request {} {}", method, path), &request.body.to_json());

        let query = self.build_query(query_args);
        let outcome = self.transport().and_then(|transport| {
            transport.send(&OutgoingRequest {
                method,
                path,
                body: &request.body,
                query: &query,
            })
        });

        match outcome {
            Ok(response) => {
                self.logger().info(
                    &format!("Response for {} {}", method, path),
                    &response.decoded_body(),
                );
                Ok(response)
            }
            Err(err @ (Error::InvalidClientId(_) | Error::UnknownEnvironment(_))) => {
                self.logger().error(
                    &format!("Response for {} {}", method, path),
                    &json!({ "message": err.to_string() }),
                );
                Err(err)
            }
            Err(err @ Error::ClientRequest { .. }) => {
                self.logger().error(
                    &err.to_string(),
                    &json!({
                        "method": method.as_str(),
                        "path": path,
                        "body": request.body.to_json(),
                        "client_id": self.client_id.expose(),
                    }),
                );
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn build_query(&self, query_args: &Params) -> Params {
        let mut query = Params::new().with(CLIENT_ID_ARG, self.client_id.expose());
        for (key, value) in query_args.iter().filter(|(key, _)| *key != CLIENT_ID_ARG) {
            query.insert(key.clone(), value.clone());
        }
        query
    }

    fn transport(&self) -> Result<&dyn Transport> {
        let transport = self.transport.get_or_try_init(|| {
            let env = EnvironmentResolver::resolve(&self.client_id)?;
            let config = self.config_store.lookup(env)?;
            tracing::debug!(environment = %env, url = %config.url, "creating transport");
            self.connector.connect(config)
        })?;
        Ok(&**transport)
    }

    fn report(&mut self, result: Result<Response>) -> Result<Response> {
        if let (Err(err), Some(handler)) = (&result, self.error_handler.as_mut()) {
            handler(err);
        }
        result
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("client_id", &self.client_id)
            .field("environment", &self.environment)
            .field("connected", &self.transport.get().is_some())
            .field("last_request", &self.last_request)
            .finish()
    }
}
