//! Recommendation text formatting.
//!
//! Two independent transforms over the same AI-generated text:
//!
//! - [`segment`] decides between a bullet list and a single paragraph.
//! - [`to_markup`] turns the markdown subset the service emits (`### ` headings,
//!   `- ` bullets) into inline markup. Rules apply per line in this order:
//!   line breaks become `<br/>`, a `### ` line becomes `<h3>`, otherwise a `- `
//!   line becomes `<li>`. A line is never both heading and bullet.
//!
//! Neither transform escapes HTML. Feed them trusted service output only.

use regex::Regex;
use std::sync::OnceLock;

/// Outcome of classifying a recommendation block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationBlock {
    /// Marker-stripped list items, in source order
    List(Vec<String>),
    /// The original text, untouched
    Paragraph(String),
}

fn numbered_item() -> &'static Regex {
    static NUMBERED_ITEM: OnceLock<Regex> = OnceLock::new();
    NUMBERED_ITEM.get_or_init(|| Regex::new(r"^\d+\.").expect("numbered item pattern is valid"))
}

fn marker_prefix() -> &'static Regex {
    static MARKER_PREFIX: OnceLock<Regex> = OnceLock::new();
    MARKER_PREFIX.get_or_init(|| Regex::new(r"^[-•\d.]\s*").expect("marker prefix pattern is valid"))
}

fn is_list_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('-') || trimmed.starts_with('•') || numbered_item().is_match(trimmed)
}

/// Drops a single marker character and the whitespace after it, so `12. x` keeps `2. x`
fn strip_marker(line: &str) -> String {
    marker_prefix().replace(line, "").into_owned()
}

/// Classify `text` as a list when one or more lines carry a list marker.
///
/// Lines are trimmed only to decide whether they are list lines; the marker is
/// stripped from the line as written.
pub fn classify(text: &str) -> RecommendationBlock {
    let items: Vec<String> = text
        .split('\n')
        .filter(|line| !line.trim().is_empty() && is_list_line(line))
        .map(strip_marker)
        .collect();

    if items.is_empty() {
        RecommendationBlock::Paragraph(text.to_string())
    } else {
        RecommendationBlock::List(items)
    }
}

/// List items of `text`, or `[text]` when it holds no list lines
pub fn segment(text: &str) -> Vec<String> {
    match classify(text) {
        RecommendationBlock::List(items) => items,
        RecommendationBlock::Paragraph(paragraph) => vec![paragraph],
    }
}

#[derive(Debug, PartialEq, Eq)]
enum MarkupLine<'a> {
    Heading(&'a str),
    Bullet(&'a str),
    Text(&'a str),
}

fn classify_line(line: &str) -> MarkupLine<'_> {
    let trimmed = line.trim_start();

    if let Some(heading) = trimmed.strip_prefix("### ") {
        MarkupLine::Heading(heading.trim_end())
    } else if let Some(item) = trimmed.strip_prefix("- ") {
        MarkupLine::Bullet(item.trim_end())
    } else {
        MarkupLine::Text(line)
    }
}

/// Convert the service's markdown subset to inline markup
pub fn to_markup(text: &str) -> String {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| match classify_line(line) {
            MarkupLine::Heading(heading) => format!("<h3>{}</h3>", heading),
            MarkupLine::Bullet(item) => format!("<li>{}</li>", item),
            MarkupLine::Text(text) => text.to_string(),
        })
        .collect::<Vec<_>>()
        .join("<br/>")
}
