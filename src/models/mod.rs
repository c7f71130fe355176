//! Data models for the marketplace API.
//!
//! - [`primitives`] - The client identifier and environment
//! - [`params`] - Typed request bodies and query arguments
//! - [`response`] - HTTP responses returned by the client

pub mod primitives;
pub mod params;
pub mod response;

pub use primitives::*;
pub use params::*;
pub use response::*;
