//! Page fetcher trait.
//!
//! Separates HTTP retrieval from the HTML content heuristics so the
//! selector logic in [`crate::extract`] stays testable in isolation.

use async_trait::async_trait;

use crate::error::Result;

/// Fetches the body of a URL.
///
/// # Implementations
///
/// - `HttpFetcher` - reqwest with timeout and a browser user-agent
/// - `MockFetcher` - canned HTML for testing
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a URL and return the response body.
    ///
    /// A non-success status is an error; the caller decides how to degrade.
    async fn fetch(&self, url: &str) -> Result<String>;
}
