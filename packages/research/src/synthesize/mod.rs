//! Structured synthesis tiers.
//!
//! Preference order: LLM synthesis, then the keyword heuristic, then mock
//! data. [`LlmSynthesizer`] carries its own keyword fallback; the mock tier
//! lives on [`crate::types::ResearchRecord::mock`] and is applied by the
//! pipeline when there is no content to synthesize at all.

mod keyword;
mod llm;

pub use keyword::KeywordSynthesizer;
pub use llm::LlmSynthesizer;
