//! LLM-backed synthesis.
//!
//! One chat-completion request per research run. The model's reply is
//! untrusted input: it is unfenced, parsed into the typed record shape, and
//! validated; any failure along the way degrades to the keyword tier.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::ai::ChatClient;
use crate::error::{ResearchError, Result};
use crate::synthesize::KeywordSynthesizer;
use crate::traits::synthesizer::Synthesizer;
use crate::types::{dedup_first_seen, truncate_chars, ExtractedContent, ResearchRecord};

/// How much of each source's text makes it into the prompt.
const PROMPT_CHARS_PER_SOURCE: usize = 800;

const SYSTEM_PROMPT: &str = "You are a research analyst that extracts structured information \
     from technical content. Always return valid JSON.";

/// Chat-completion synthesizer with an internal keyword fallback.
pub struct LlmSynthesizer {
    client: ChatClient,
}

impl LlmSynthesizer {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    async fn try_llm(&self, items: &[ExtractedContent], topic: &str) -> Result<ResearchRecord> {
        let prompt = build_prompt(items, topic);
        let response = self.client.chat(SYSTEM_PROMPT, &prompt).await?;
        debug!(model = self.client.model(), chars = response.len(), "model response received");

        let mut record = parse_record(&response)?;
        record.clamp_entries();
        // The model's claimed sources are untrusted; report what was fetched.
        record.sources = dedup_first_seen(items.iter().map(|item| item.source.clone()).collect());
        Ok(record)
    }
}

#[async_trait]
impl Synthesizer for LlmSynthesizer {
    async fn synthesize(&self, items: &[ExtractedContent], topic: &str) -> ResearchRecord {
        match self.try_llm(items, topic).await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "LLM synthesis failed, falling back to keyword analysis");
                KeywordSynthesizer::analyze(items)
            }
        }
    }
}

fn build_prompt(items: &[ExtractedContent], topic: &str) -> String {
    let combined = items
        .iter()
        .map(|item| {
            format!(
                "Source: {}\nContent: {}",
                item.source,
                truncate_chars(&item.text, PROMPT_CHARS_PER_SOURCE)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Analyze the following research content about {topic} and extract structured information.\n\
         \n\
         RESEARCH CONTENT:\n\
         {combined}\n\
         \n\
         Provide a JSON response with the following structure:\n\
         {{\n\
             \"key_points\": [\"list 3-5 key findings\"],\n\
             \"recent_developments\": [\"list 2-3 recent advancements\"],\n\
             \"challenges\": [\"list 2-3 main challenges\"],\n\
             \"future_outlook\": [\"list 2-3 future predictions\"],\n\
             \"sources\": [\"list of source URLs\"]\n\
         }}\n\
         \n\
         Be concise and factual. Focus on the most important information.\n\
         Return only valid JSON, no additional text."
    )
}

/// Parse a model reply into the record shape, rejecting incomplete output.
fn parse_record(response: &str) -> Result<ResearchRecord> {
    let record: ResearchRecord = serde_json::from_str(strip_code_fences(response))?;
    if record.has_empty_section() {
        return Err(ResearchError::RejectedOutput {
            reason: "empty section in model output".to_string(),
        });
    }
    Ok(record)
}

/// Strip a Markdown code-fence wrapper (with optional `json` language tag).
fn strip_code_fences(text: &str) -> &str {
    let mut out = text.trim();
    if let Some(rest) = out.strip_prefix("```json") {
        out = rest;
    } else if let Some(rest) = out.strip_prefix("```") {
        out = rest;
    }
    out = out.trim();
    if let Some(rest) = out.strip_suffix("```") {
        out = rest;
    }
    out.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_BODY: &str = r#"{
        "key_points": ["point one"],
        "recent_developments": ["dev one"],
        "challenges": ["challenge one"],
        "future_outlook": ["outlook one"],
        "sources": ["https://example.org/a"]
    }"#;

    #[test]
    fn fenced_json_parses_identically_to_unfenced() {
        let fenced = format!("```json\n{VALID_BODY}\n```");
        assert_eq!(parse_record(&fenced).unwrap(), parse_record(VALID_BODY).unwrap());
    }

    #[test]
    fn bare_fence_without_language_tag_is_stripped() {
        let fenced = format!("```\n{VALID_BODY}\n```");
        assert_eq!(parse_record(&fenced).unwrap(), parse_record(VALID_BODY).unwrap());
    }

    #[test]
    fn unfenced_text_is_untouched() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let body = r#"{"key_points": ["x"], "sources": []}"#;
        assert!(matches!(
            parse_record(body),
            Err(ResearchError::MalformedOutput(_))
        ));
    }

    #[test]
    fn empty_section_is_rejected() {
        let body = r#"{
            "key_points": [],
            "recent_developments": ["dev"],
            "challenges": ["ch"],
            "future_outlook": ["fo"],
            "sources": []
        }"#;
        assert!(matches!(
            parse_record(body),
            Err(ResearchError::RejectedOutput { .. })
        ));
    }

    #[test]
    fn non_json_is_a_parse_error() {
        assert!(parse_record("Sorry, I cannot help with that.").is_err());
    }

    #[test]
    fn prompt_labels_each_source_and_truncates_content() {
        let items = [
            ExtractedContent::new("a".repeat(1200), "https://example.org/a"),
            ExtractedContent::new("short text", "https://example.org/b"),
        ];

        let prompt = build_prompt(&items, "quantum computing");

        assert!(prompt.contains("about quantum computing"));
        assert!(prompt.contains("Source: https://example.org/a"));
        assert!(prompt.contains("Source: https://example.org/b"));
        // Only the first 800 chars of the long source are included.
        assert!(prompt.contains(&"a".repeat(800)));
        assert!(!prompt.contains(&"a".repeat(801)));
    }
}
