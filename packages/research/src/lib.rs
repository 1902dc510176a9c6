//! Best-Effort Topic Research Pipeline
//!
//! Turns a free-text topic into a fixed-shape research record:
//! source discovery (web search + trusted-domain allow-list) → content
//! extraction (main-region heuristics + normalization) → structured
//! synthesis (LLM, keyword heuristic, or mock data).
//!
//! # Design
//!
//! - Degrade, never fail: every stage maps its failures to the next
//!   fallback tier, so [`pipeline::ResearchPipeline::research`] always
//!   returns a well-formed [`types::ResearchRecord`].
//! - Trait seams at every external dependency ([`traits::WebSearcher`],
//!   [`traits::PageFetcher`], [`traits::Synthesizer`]) so the whole chain
//!   runs against mocks.
//! - Model output is untrusted input, validated against the typed record
//!   shape and rejected to the keyword tier on any mismatch.
//!
//! # Modules
//!
//! - [`traits`] - trait seams for search, fetch, and synthesis
//! - [`types`] - record and content types
//! - [`discovery`] - allow-listed source discovery
//! - [`extract`] - main-content extraction and normalization
//! - [`synthesize`] - LLM and keyword synthesis tiers
//! - [`pipeline`] - orchestration
//! - [`testing`] - mocks for network-free tests

pub mod ai;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod search;
pub mod synthesize;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use ai::ChatClient;
pub use discovery::{DiscoveredSources, SourceDiscovery, TRUSTED_DOMAINS};
pub use error::{ResearchError, Result};
pub use extract::{ContentExtractor, HttpFetcher, DEFAULT_CONTENT_SELECTORS, MAX_CONTENT_CHARS};
pub use pipeline::ResearchPipeline;
pub use search::DuckDuckGoSearcher;
pub use synthesize::{KeywordSynthesizer, LlmSynthesizer};
pub use traits::{
    fetcher::PageFetcher,
    searcher::{SearchResult, WebSearcher},
    synthesizer::Synthesizer,
};
pub use types::{ExtractedContent, ResearchRecord, MAX_ENTRY_CHARS};
