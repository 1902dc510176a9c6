//! Web searcher trait for source discovery.
//!
//! Abstracts over search providers so discovery logic (allow-listing,
//! over-fetch, mock fallback) can be exercised against canned results.

use async_trait::async_trait;

use crate::error::Result;

/// A single result returned by a search provider, in rank order.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The result URL.
    pub url: String,

    /// Title of the page, if the provider reports one.
    pub title: Option<String>,

    /// Snippet/description from the result listing.
    pub snippet: Option<String>,
}

impl SearchResult {
    /// Create a bare result from a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            snippet: None,
        }
    }

    /// Add a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// Web search provider.
///
/// # Implementations
///
/// - `DuckDuckGoSearcher` - DuckDuckGo HTML endpoint
/// - `MockWebSearcher` - canned results for testing
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Search the web, returning up to `max_results` results in the
    /// provider's rank order.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}
