//! Pipeline orchestration: discovery, extraction, synthesis.
//!
//! `research()` never fails. Each stage degrades to the next fallback tier
//! (live data, keyword analysis inside the synthesizer, mock data), so the
//! caller always receives a well-formed record.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::discovery::{DiscoveredSources, SourceDiscovery};
use crate::extract::ContentExtractor;
use crate::traits::fetcher::PageFetcher;
use crate::traits::searcher::WebSearcher;
use crate::traits::synthesizer::Synthesizer;
use crate::types::{ExtractedContent, ResearchRecord};

const DEFAULT_SOURCE_COUNT: usize = 3;

/// Pause between consecutive fetches, to be polite to target servers.
const DEFAULT_FETCH_DELAY: Duration = Duration::from_secs(1);

/// Sequences discovery, extraction, and synthesis for one topic.
///
/// Stateless across invocations: concurrent calls share nothing but the
/// underlying HTTP clients.
pub struct ResearchPipeline {
    discovery: SourceDiscovery,
    extractor: ContentExtractor,
    synthesizer: Arc<dyn Synthesizer>,
    source_count: usize,
    fetch_delay: Duration,
}

impl ResearchPipeline {
    pub fn new(
        searcher: Arc<dyn WebSearcher>,
        fetcher: Arc<dyn PageFetcher>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            discovery: SourceDiscovery::new(searcher),
            extractor: ContentExtractor::new(fetcher),
            synthesizer,
            source_count: DEFAULT_SOURCE_COUNT,
            fetch_delay: DEFAULT_FETCH_DELAY,
        }
    }

    /// Set how many sources to research (default 3).
    pub fn with_source_count(mut self, count: usize) -> Self {
        self.source_count = count;
        self
    }

    /// Set the politeness delay between fetches (tests use zero).
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Research a topic. Always returns a well-formed record.
    pub async fn research(&self, topic: &str) -> ResearchRecord {
        let discovered = self.discovery.discover(topic, self.source_count).await;
        let DiscoveredSources::Found(urls) = discovered else {
            info!(topic, "no live sources discovered, returning demonstration data");
            return ResearchRecord::mock(topic);
        };

        info!(topic, sources = urls.len(), "extracting content");
        let items = self.extract_all(&urls).await;
        if items.is_empty() {
            info!(topic, "no content extracted from any source, returning demonstration data");
            return ResearchRecord::mock(topic);
        }

        self.synthesizer.synthesize(&items, topic).await
    }

    /// Extract each URL in discovery order, pausing between fetches.
    async fn extract_all(&self, urls: &[String]) -> Vec<ExtractedContent> {
        let mut items = Vec::new();
        for (index, url) in urls.iter().enumerate() {
            if index > 0 && !self.fetch_delay.is_zero() {
                tokio::time::sleep(self.fetch_delay).await;
            }
            info!(url = %url, source = index + 1, total = urls.len(), "reading source");
            if let Some(item) = self.extractor.extract(url).await {
                items.push(item);
            }
        }
        items
    }
}
