//! Source discovery: search, allow-list filtering, mock fallback.
//!
//! Discovery never fails. A provider error is treated as zero results, and
//! zero accepted results degrade to a fixed set of deterministic mock URLs
//! so downstream stages always have something to report.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::traits::searcher::WebSearcher;

/// Hosts considered trustworthy enough to use as research sources.
pub const TRUSTED_DOMAINS: &[&str] = &[
    "wikipedia.org",
    "arxiv.org",
    "nature.com",
    "science.org",
    "technologyreview.com",
    "ieee.org",
    "acm.org",
    "nist.gov",
    "mit.edu",
    "stanford.edu",
    "researchgate.net",
    "springer.com",
    "sciencedirect.com",
    "towardsdatascience.com",
    "techcrunch.com",
    "medium.com",
    "github.com",
    "stackoverflow.com",
];

/// Fixed qualifier appended to every topic before searching.
const QUERY_QUALIFIER: &str = "technology research 2024";

/// Extra results requested beyond the desired count to absorb filtering
/// losses.
const OVERFETCH: usize = 2;

/// URLs selected for extraction, tagged with their provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveredSources {
    /// Allow-listed URLs from a live search, in rank order.
    Found(Vec<String>),
    /// Deterministic stand-ins; the pipeline bypasses extraction for these.
    Mock(Vec<String>),
}

impl DiscoveredSources {
    pub fn urls(&self) -> &[String] {
        match self {
            Self::Found(urls) | Self::Mock(urls) => urls,
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, Self::Mock(_))
    }
}

/// Discovers source URLs for a topic via web search.
pub struct SourceDiscovery {
    searcher: Arc<dyn WebSearcher>,
}

impl SourceDiscovery {
    pub fn new(searcher: Arc<dyn WebSearcher>) -> Self {
        Self { searcher }
    }

    /// Find up to `desired` allow-listed source URLs for `topic`.
    pub async fn discover(&self, topic: &str, desired: usize) -> DiscoveredSources {
        let query = format!("{topic} {QUERY_QUALIFIER}");

        let results = match self.searcher.search(&query, desired + OVERFETCH).await {
            Ok(results) => results,
            Err(e) => {
                warn!(topic, error = %e, "search provider failed");
                Vec::new()
            }
        };

        let mut urls = Vec::new();
        for result in results {
            if is_trusted(&result.url) {
                debug!(url = %result.url, "reliable source found");
                urls.push(result.url);
                if urls.len() >= desired {
                    break;
                }
            }
        }

        if urls.is_empty() {
            warn!(topic, "no reliable sources found, using mock sources");
            DiscoveredSources::Mock(mock_urls(topic))
        } else {
            DiscoveredSources::Found(urls)
        }
    }
}

/// Whether a URL's host lands on the trusted-domain allow-list
/// (case-insensitive substring match on the host).
pub fn is_trusted(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_lowercase();
    TRUSTED_DOMAINS.iter().any(|domain| host.contains(domain))
}

/// Deterministic mock URLs derived from the topic.
pub fn mock_urls(topic: &str) -> Vec<String> {
    vec![
        format!("https://en.wikipedia.org/wiki/{}", topic.replace(' ', "_")),
        "https://arxiv.org/list/cs/recent".to_string(),
        "https://www.technologyreview.com/".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingSearcher, MockWebSearcher};

    fn query_for(topic: &str) -> String {
        format!("{topic} {QUERY_QUALIFIER}")
    }

    #[test]
    fn wikipedia_host_is_trusted() {
        assert!(is_trusted("https://en.wikipedia.org/wiki/Rust"));
        assert!(is_trusted("https://EN.WIKIPEDIA.ORG/wiki/Rust"));
    }

    #[test]
    fn unknown_host_is_rejected() {
        assert!(!is_trusted("https://totally-random-blog.test/post"));
    }

    #[test]
    fn trusted_domain_in_path_is_not_enough() {
        assert!(!is_trusted("https://evil.test/wikipedia.org/page"));
    }

    #[test]
    fn unparseable_url_is_rejected() {
        assert!(!is_trusted("not a url"));
    }

    #[test]
    fn mock_urls_substitute_the_topic() {
        let urls = mock_urls("quantum computing");
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], "https://en.wikipedia.org/wiki/quantum_computing");
    }

    #[tokio::test]
    async fn filters_to_allow_listed_urls_in_order() {
        let searcher = MockWebSearcher::new().with_urls(
            &query_for("rust"),
            &[
                "https://totally-random-blog.test/one",
                "https://en.wikipedia.org/wiki/Rust",
                "https://arxiv.org/abs/1",
                "https://another-blog.test/two",
                "https://github.com/rust-lang/rust",
            ],
        );
        let discovery = SourceDiscovery::new(Arc::new(searcher));

        let discovered = discovery.discover("rust", 3).await;

        assert!(!discovered.is_mock());
        assert_eq!(
            discovered.urls(),
            &[
                "https://en.wikipedia.org/wiki/Rust",
                "https://arxiv.org/abs/1",
                "https://github.com/rust-lang/rust",
            ]
        );
    }

    #[tokio::test]
    async fn stops_at_desired_count() {
        let searcher = MockWebSearcher::new().with_urls(
            &query_for("rust"),
            &[
                "https://en.wikipedia.org/wiki/Rust",
                "https://arxiv.org/abs/1",
                "https://github.com/a/b",
            ],
        );
        let discovery = SourceDiscovery::new(Arc::new(searcher));

        let discovered = discovery.discover("rust", 2).await;
        assert_eq!(discovered.urls().len(), 2);
    }

    #[tokio::test]
    async fn fewer_matches_than_desired_are_returned_unpadded() {
        let searcher = MockWebSearcher::new().with_urls(
            &query_for("rust"),
            &[
                "https://en.wikipedia.org/wiki/Rust",
                "https://random.test/x",
            ],
        );
        let discovery = SourceDiscovery::new(Arc::new(searcher));

        let discovered = discovery.discover("rust", 3).await;
        assert_eq!(discovered.urls().len(), 1);
        assert!(!discovered.is_mock());
    }

    #[tokio::test]
    async fn zero_matches_degrade_to_mock_urls() {
        let searcher =
            MockWebSearcher::new().with_urls(&query_for("rust"), &["https://random.test/x"]);
        let discovery = SourceDiscovery::new(Arc::new(searcher));

        let discovered = discovery.discover("rust", 3).await;

        assert!(discovered.is_mock());
        assert_eq!(discovered.urls(), &mock_urls("rust")[..]);
    }

    #[tokio::test]
    async fn provider_error_degrades_to_mock_urls() {
        let discovery = SourceDiscovery::new(Arc::new(FailingSearcher));

        let discovered = discovery.discover("rust", 3).await;
        assert!(discovered.is_mock());
        assert_eq!(discovered.urls().len(), 3);
    }
}
