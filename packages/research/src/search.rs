//! DuckDuckGo-backed web searcher.
//!
//! Talks to the DuckDuckGo HTML endpoint (no API key required) and parses
//! the result listing with CSS selectors. Result URLs arrive wrapped in a
//! redirect link, which is decoded before being handed to discovery.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::{ResearchError, Result};
use crate::traits::searcher::{SearchResult, WebSearcher};

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Region hint for unlocalized results.
const DEFAULT_REGION: &str = "wt-wt";

/// Web searcher backed by the DuckDuckGo HTML endpoint.
pub struct DuckDuckGoSearcher {
    client: reqwest::Client,
    region: String,
}

impl DuckDuckGoSearcher {
    /// Create a new searcher with the default region hint.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ResearchError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            region: DEFAULT_REGION.to_string(),
        })
    }

    /// Set the region hint (DuckDuckGo `kl` parameter).
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}

#[async_trait]
impl WebSearcher for DuckDuckGoSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .post(SEARCH_ENDPOINT)
            .form(&[("q", query), ("kl", self.region.as_str())])
            .header("Accept", "text/html")
            .send()
            .await
            .map_err(|e| ResearchError::Search(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::Search(
                format!("DuckDuckGo HTML search error: {status}").into(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResearchError::Search(Box::new(e)))?;

        // Parsing stays in a sync helper: `scraper::Html` is !Send and must
        // not live across an await.
        let results = parse_results(&body, max_results);
        debug!(query, count = results.len(), "search results parsed");
        Ok(results)
    }
}

/// Parse a DuckDuckGo HTML result page into ranked results.
fn parse_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);

    let (Ok(result_sel), Ok(link_sel), Ok(snippet_sel)) = (
        Selector::parse(".result"),
        Selector::parse("a.result__a"),
        Selector::parse("a.result__snippet, .result__snippet"),
    ) else {
        return Vec::new();
    };

    let mut results = Vec::new();
    for result in document.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }

        let Some(link) = result.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let url = decode_redirect(href);
        if !url.starts_with("http") {
            continue;
        }

        let title = link.text().collect::<String>().trim().to_string();
        let snippet = result
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty());

        let mut item = SearchResult::new(url);
        if !title.is_empty() {
            item = item.with_title(title);
        }
        if let Some(snippet) = snippet {
            item = item.with_snippet(snippet);
        }
        results.push(item);
    }

    results
}

/// DuckDuckGo wraps result URLs in redirect links like
/// `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`.
/// Extract and percent-decode the actual destination URL.
fn decode_redirect(href: &str) -> String {
    if let Some(pos) = href.find("uddg=") {
        let start = pos + 5;
        let end = href[start..]
            .find('&')
            .map(|i| start + i)
            .unwrap_or(href.len());
        return urlencoding::decode(&href[start..end])
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| href[start..end].to_string());
    }
    href.to_string()
}
