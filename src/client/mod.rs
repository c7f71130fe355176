//! HTTP client and pagination for the marketplace API.
//!
//! This module provides the main entry point [`ApiClient`].
//!
//! # Example
//!
//! ```no_run
//! use mpapi_client::{ApiClient, Method, Params};
//!
//! # fn example() -> mpapi_client::Result<()> {
//! let mut client = ApiClient::new("test_4f0c2a")?;
//!
//! let products = client.fetch_all(
//!     "products",
//!     Method::GET,
//!     Params::new(),
//!     Params::new().with("filter", "active"),
//! )?;
//! # Ok(())
//! # }
//! ```

mod config;
mod environment;
mod http;
mod logger;
pub mod paginated;
mod transport;

pub use config::{ClientConfig, ConfigSource, ConfigStore, ConnectionConfig};
pub use environment::EnvironmentResolver;
pub use http::{ApiClient, ErrorHandler, RequestSnapshot, CLIENT_ID_ARG};
pub use logger::{Logger, NullLogger, TracingLogger, LOG_TARGET};
pub use paginated::{PageAggregator, PageState, PagingInfo, RepeatRequest, PAGE_ARG};
pub use transport::{Connector, OutgoingRequest, ReqwestConnector, ReqwestTransport, Transport};
