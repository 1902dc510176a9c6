//! Core data types for the research pipeline.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Maximum length, in characters, of a single finding entry.
pub const MAX_ENTRY_CHARS: usize = 250;

/// The synthesized output of a research run.
///
/// Every fallback tier (LLM, keyword heuristic, mock) produces this exact
/// shape. It is also the validation target for untrusted LLM output: a model
/// response that does not deserialize into this structure is rejected and
/// the pipeline degrades to the keyword tier.
///
/// Invariants: all four text lists hold entries of at most
/// [`MAX_ENTRY_CHARS`] characters, no field is ever empty, and `sources`
/// holds only URLs that were actually fetched (or the fixed mock set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchRecord {
    /// Short findings, target 3-5 entries (heuristic mode caps at 4).
    pub key_points: Vec<String>,
    /// Recent advancements, target 2-3 entries.
    pub recent_developments: Vec<String>,
    /// Main challenges, target 2-3 entries.
    pub challenges: Vec<String>,
    /// Future predictions, target 2-3 entries.
    pub future_outlook: Vec<String>,
    /// Deduplicated source URLs, first-seen order.
    pub sources: Vec<String>,
}

impl ResearchRecord {
    /// Deterministic demonstration record for when no live data is
    /// available at all: discovery found nothing real, or every extraction
    /// came back empty.
    pub fn mock(topic: &str) -> Self {
        Self {
            key_points: vec![
                format!("Recent advances in {topic} show promising results for practical applications"),
                format!("Major tech companies are investing heavily in {topic} research and development"),
                format!("New algorithms and approaches in {topic} are solving previously intractable problems"),
            ],
            recent_developments: vec![
                format!("Breakthrough in {topic} stability and performance achieved in recent studies"),
                format!("New government and private funding initiatives for {topic} research announced"),
            ],
            challenges: vec![
                format!("Scalability remains a major challenge for widespread {topic} adoption"),
                format!("Technical limitations and resource requirements in {topic} need further research"),
            ],
            future_outlook: vec![
                format!("Industry experts predict {topic} will become commercially viable within 5-10 years"),
                format!("{topic} is expected to revolutionize multiple industries including healthcare, finance, and logistics"),
            ],
            sources: mock_record_sources(),
        }
    }

    /// True when any of the four text lists is empty. Used to reject
    /// incomplete LLM output before it can violate the non-empty invariant.
    pub fn has_empty_section(&self) -> bool {
        self.key_points.is_empty()
            || self.recent_developments.is_empty()
            || self.challenges.is_empty()
            || self.future_outlook.is_empty()
    }

    /// Truncate every text-list entry to [`MAX_ENTRY_CHARS`] characters.
    pub fn clamp_entries(&mut self) {
        for list in [
            &mut self.key_points,
            &mut self.recent_developments,
            &mut self.challenges,
            &mut self.future_outlook,
        ] {
            for entry in list.iter_mut() {
                if entry.chars().count() > MAX_ENTRY_CHARS {
                    *entry = truncate_chars(entry, MAX_ENTRY_CHARS);
                }
            }
        }
    }
}

/// The fixed source URLs carried by the mock record.
pub fn mock_record_sources() -> Vec<String> {
    vec![
        "https://en.wikipedia.org/wiki/Demonstration".to_string(),
        "https://example.com/technical-research".to_string(),
        "https://example.com/industry-analysis".to_string(),
    ]
}

/// Normalized text pulled from one source page. Ephemeral: consumed
/// immediately by the synthesizer, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Whitespace-normalized text, at most 2500 characters.
    pub text: String,
    /// The URL the text came from.
    pub source: String,
}

impl ExtractedContent {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// Truncate a string to at most `max` characters, respecting char
/// boundaries.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Deduplicate while preserving first-seen order.
pub fn dedup_first_seen(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
