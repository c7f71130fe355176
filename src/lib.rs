//! # mpapi-client
//!
//! A blocking Rust client for the marketplace API.
//!
//! The client authenticates every request with a client identifier, routes
//! it to the test or production API depending on the environment encoded in
//! that identifier, logs request and response activity, and can transparently
//! collect every page of a paged list response.
//!
//! ## Features
//!
//! - **Environment routing**: `test_…` identifiers hit the test API, `prod_…`
//!   identifiers hit production
//! - **Request replay**: re-send the last request with extra query arguments
//! - **Pagination**: concatenate all pages of a list response in page order
//! - **Pluggable seams**: logger, transport and configuration source
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mpapi_client::{ApiClient, Method, Params};
//!
//! fn main() -> mpapi_client::Result<()> {
//!     let mut client = ApiClient::new("test_4f0c2a")?;
//!
//!     // A single request
//!     let response = client.send_request("products/P-100", Method::GET, Params::new(), Params::new())?;
//!     println!("status: {}", response.status);
//!
//!     // Every page of a listing
//!     let orders = client.fetch_all("orders", Method::GET, Params::new(), Params::new())?;
//!     println!("orders: {}", orders);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Replay
//!
//! ```rust,no_run
//! use mpapi_client::{ApiClient, Method, Params};
//!
//! # fn main() -> mpapi_client::Result<()> {
//! let mut client = ApiClient::new("test_4f0c2a")?;
//! client.send_request("orders", Method::GET, Params::new(), Params::new().with("filter", "open"))?;
//!
//! // GET orders?filter=open&page=3&client_id=…
//! let third = client.repeat_last_request(Params::new().with("page", 3))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use client::{
    ApiClient, ClientConfig, ConfigSource, ConfigStore, ConnectionConfig, EnvironmentResolver,
    Logger, NullLogger, PageAggregator, RequestSnapshot, TracingLogger,
};
pub use error::{Error, Result};
pub use models::{ClientId, Environment, ParamValue, Params, Response};
pub use reqwest::Method;

/// Prelude module for convenient imports.
///
/// ```rust
/// use mpapi_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{
        ApiClient, ClientConfig, ConfigSource, Connector, Logger, PageAggregator, RepeatRequest,
        Transport,
    };
    pub use crate::error::{Error, Result};
    pub use crate::models::{ClientId, Environment, ParamValue, Params, Response};
    pub use reqwest::Method;
}
