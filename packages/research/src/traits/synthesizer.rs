//! Synthesizer trait: extracted content in, research record out.

use async_trait::async_trait;

use crate::types::{ExtractedContent, ResearchRecord};

/// Produces a [`ResearchRecord`] from extracted page content.
///
/// Infallible by contract: implementations degrade internally (the LLM
/// synthesizer falls back to keyword analysis) rather than surfacing
/// errors to the pipeline.
///
/// # Implementations
///
/// - `LlmSynthesizer` - chat-completion synthesis, keyword fallback inside
/// - `KeywordSynthesizer` - deterministic keyword heuristic
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, items: &[ExtractedContent], topic: &str) -> ResearchRecord;
}
