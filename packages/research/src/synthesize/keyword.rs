//! Keyword-heuristic synthesis.
//!
//! Deterministic scoring used when no LLM credential is configured, and as
//! the failure fallback for LLM synthesis. Sentences are bucketed by fixed
//! keyword sets; a sentence may land in several buckets.

use async_trait::async_trait;

use crate::traits::synthesizer::Synthesizer;
use crate::types::{
    dedup_first_seen, truncate_chars, ExtractedContent, ResearchRecord, MAX_ENTRY_CHARS,
};

// Sentence length bounds (exclusive): shorter is noise, longer is a run-on
// or scraped junk.
const MIN_SENTENCE_CHARS: usize = 30;
const MAX_SENTENCE_CHARS: usize = 300;

/// Per-section cap after dedup.
const MAX_SECTION_ENTRIES: usize = 4;

const KEY_POINT_TERMS: &[&str] = &[
    "breakthrough",
    "advance",
    "discovery",
    "innovation",
    "developed",
    "created",
    "achieved",
    "successful",
];

const CHALLENGE_TERMS: &[&str] = &[
    "challenge",
    "limitation",
    "problem",
    "issue",
    "difficult",
    "hard",
    "bottleneck",
    "constraint",
];

const FUTURE_TERMS: &[&str] = &[
    "future",
    "outlook",
    "prediction",
    "trend",
    "will",
    "expected",
    "potential",
    "prospect",
];

const KEY_POINTS_PLACEHOLDER: &str = "Key findings extracted from research content";
const CHALLENGES_PLACEHOLDER: &str = "Various technical challenges identified";
const FUTURE_PLACEHOLDER: &str = "Promising future developments expected";
const RECENT_PLACEHOLDER: &str = "Recent developments in the field";

/// Deterministic keyword-scoring synthesizer.
pub struct KeywordSynthesizer;

impl KeywordSynthesizer {
    /// Pure analysis core, shared with the LLM tier's failure path.
    pub fn analyze(items: &[ExtractedContent]) -> ResearchRecord {
        let mut key_points = Vec::new();
        let mut challenges = Vec::new();
        let mut future_outlook = Vec::new();
        let mut sources = Vec::new();

        for item in items {
            for sentence in item.text.split('.') {
                let sentence = sentence.trim();
                let length = sentence.chars().count();
                if length <= MIN_SENTENCE_CHARS || length >= MAX_SENTENCE_CHARS {
                    continue;
                }

                let lowered = sentence.to_lowercase();
                if matches_any(&lowered, KEY_POINT_TERMS) {
                    key_points.push(truncate_chars(sentence, MAX_ENTRY_CHARS));
                }
                if matches_any(&lowered, CHALLENGE_TERMS) {
                    challenges.push(truncate_chars(sentence, MAX_ENTRY_CHARS));
                }
                if matches_any(&lowered, FUTURE_TERMS) {
                    future_outlook.push(truncate_chars(sentence, MAX_ENTRY_CHARS));
                }
            }
            sources.push(item.source.clone());
        }

        // Stable first-seen dedup before the cap, so which entries survive
        // is deterministic.
        let mut key_points = dedup_first_seen(key_points);
        key_points.truncate(MAX_SECTION_ENTRIES);
        let mut challenges = dedup_first_seen(challenges);
        challenges.truncate(MAX_SECTION_ENTRIES);
        let mut future_outlook = dedup_first_seen(future_outlook);
        future_outlook.truncate(MAX_SECTION_ENTRIES);

        // Always derived from key_points, never independently populated.
        let recent_developments = if key_points.is_empty() {
            vec![RECENT_PLACEHOLDER.to_string()]
        } else {
            key_points.iter().take(2).cloned().collect()
        };

        if key_points.is_empty() {
            key_points.push(KEY_POINTS_PLACEHOLDER.to_string());
        }
        if challenges.is_empty() {
            challenges.push(CHALLENGES_PLACEHOLDER.to_string());
        }
        if future_outlook.is_empty() {
            future_outlook.push(FUTURE_PLACEHOLDER.to_string());
        }

        ResearchRecord {
            key_points,
            recent_developments,
            challenges,
            future_outlook,
            sources: dedup_first_seen(sources),
        }
    }
}

fn matches_any(sentence: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| sentence.contains(term))
}

#[async_trait]
impl Synthesizer for KeywordSynthesizer {
    async fn synthesize(&self, items: &[ExtractedContent], _topic: &str) -> ResearchRecord {
        Self::analyze(items)
    }
}
