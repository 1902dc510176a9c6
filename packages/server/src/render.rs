//! Markdown presentation rendering for finished research records.

use chrono::Utc;
use pulldown_cmark::{html, Parser};

use research::ResearchRecord;

/// Render a research record as a lightly-templated Markdown document.
pub fn render_presentation(record: &ResearchRecord, topic: &str) -> String {
    let mut doc = String::new();

    doc.push_str(&format!("# Research Briefing: {topic}\n\n"));
    doc.push_str(&format!(
        "*Generated on {}*\n\n",
        Utc::now().format("%Y-%m-%d")
    ));

    push_section(&mut doc, "Key Points", &record.key_points);
    push_section(&mut doc, "Recent Developments", &record.recent_developments);
    push_section(&mut doc, "Challenges", &record.challenges);
    push_section(&mut doc, "Future Outlook", &record.future_outlook);

    doc.push_str("## Sources\n\n");
    for (index, source) in record.sources.iter().enumerate() {
        doc.push_str(&format!("{}. {}\n", index + 1, source));
    }

    doc
}

fn push_section(doc: &mut String, title: &str, items: &[String]) {
    doc.push_str(&format!("## {title}\n\n"));
    for item in items {
        doc.push_str(&format!("- {item}\n"));
    }
    doc.push('\n');
}

/// Convert the Markdown presentation to HTML for inline display.
pub fn render_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
