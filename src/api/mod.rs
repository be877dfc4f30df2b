//! Authenticated HTTP transport for the fleet API.
//!
//! The client covers the registry read/write operations, the telemetry
//! endpoints consumed by the polling pipeline, authentication, and the
//! summary-report download. See [`ApiError`] for the error taxonomy.

mod client;
mod error;
mod session;

pub use client::{ApiClient, ApiClientBuilder};
pub use error::ApiError;
pub use session::Session;
