//! Content extraction: fetch a page, isolate the main content region,
//! normalize the text.
//!
//! The selector heuristic is an ordered first-match-wins list, kept
//! separate from fetching so it can be exercised on raw HTML with no
//! network. Extraction never propagates failures: a bad fetch or an empty
//! page yields `None` and the pipeline moves on to the next source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::{ResearchError, Result};
use crate::traits::fetcher::PageFetcher;
use crate::types::{truncate_chars, ExtractedContent};

/// Maximum length, in characters, of extracted page text.
pub const MAX_CONTENT_CHARS: usize = 2500;

/// Content-container selectors, highest priority first.
pub const DEFAULT_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role=\"main\"]",
    ".content",
    ".main",
    ".article",
    ".post-content",
    ".entry-content",
    ".story-content",
];

/// Elements whose text never counts as content.
const SKIP_ELEMENTS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "noscript",
];

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

// Browser-like User-Agent to avoid bot detection.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP page fetcher with a timeout and a realistic user-agent.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| ResearchError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await.map_err(|e| {
            ResearchError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        response.text().await.map_err(|e| ResearchError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Extracts normalized main-content text from web pages.
pub struct ContentExtractor {
    fetcher: Arc<dyn PageFetcher>,
    selectors: Vec<Selector>,
}

impl ContentExtractor {
    /// Create an extractor with the default content-selector priority list.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            selectors: parse_selectors(DEFAULT_CONTENT_SELECTORS),
        }
    }

    /// Replace the content-selector priority list.
    pub fn with_selectors(mut self, selectors: &[&str]) -> Self {
        self.selectors = parse_selectors(selectors);
        self
    }

    /// Fetch a URL and extract its content, or `None` on any failure.
    pub async fn extract(&self, url: &str) -> Option<ExtractedContent> {
        let html = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %url, error = %e, "failed to fetch page");
                return None;
            }
        };

        let text = self.extract_text(&html)?;
        debug!(url = %url, chars = text.chars().count(), "content extracted");
        Some(ExtractedContent::new(text, url))
    }

    /// Pull normalized text out of an HTML document. Pure; no network.
    ///
    /// Returns `None` when nothing remains after boilerplate removal and
    /// whitespace normalization.
    pub fn extract_text(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let region = self.select_region(&document);

        let mut raw = String::new();
        collect_text(region, &mut raw);

        let normalized = normalize_whitespace(&raw);
        if normalized.is_empty() {
            return None;
        }

        Some(truncate_chars(&normalized, MAX_CONTENT_CHARS).trim().to_string())
    }

    /// First matching content container, falling back to `body`, then the
    /// document root.
    fn select_region<'a>(&self, document: &'a Html) -> ElementRef<'a> {
        for selector in &self.selectors {
            if let Some(element) = document.select(selector).next() {
                return element;
            }
        }

        if let Ok(body) = Selector::parse("body") {
            if let Some(body) = document.select(&body).next() {
                return body;
            }
        }

        document.root_element()
    }
}

fn parse_selectors(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!(selector = %s, error = %e, "skipping invalid content selector");
                None
            }
        })
        .collect()
}

/// Concatenate descendant text, skipping non-content subtrees.
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(&text.text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !SKIP_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, out);
            }
        }
    }
}

/// Line-trim, split double-space runs, drop empties, then collapse any
/// remaining whitespace runs to single spaces.
fn normalize_whitespace(text: &str) -> String {
    let joined = text
        .lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
