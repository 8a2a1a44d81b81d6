//! Fetching relation statistics from the public API.
//!
//! One HTTP GET per polling cycle, no retries. The [`StatSource`] trait is the
//! seam the coordinator depends on; [`StatClient`] is the HTTP implementation.

mod client;
mod error;
mod types;

use async_trait::async_trait;

pub use client::StatClient;
pub use error::FetchError;
pub use types::{FetchResult, FetcherConfig, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, STAT_PATH};

/// A source of relation statistics for a tracked id.
#[async_trait]
pub trait StatSource: Send + Sync {
    /// Fetch the current statistics for `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the request fails at the transport
    /// level, the body cannot be parsed, or the upstream reports a non-zero
    /// status code.
    async fn fetch(&self, id: &str) -> Result<FetchResult, FetchError>;
}
