//! Mapping of raw feed entries onto [`Article`] records.
//!
//! Normalization is pure. Nothing here logs, and nothing here fails: a date
//! that cannot be made canonical keeps its feed text, and a summary that is
//! not really HTML is treated as the plain text it is.

use super::parser::{EntryField, RawEntry, TimeTuple};
use crate::models::Article;
use scraper::Html;
use scraper::node::Node;

/// Elements whose text never reaches a summary.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Build the [`Article`] for one entry of the feed `source` from `country`.
///
/// - `title` and `link` are trimmed, empty when absent.
/// - `published` is the entry's published text, else its updated text, else
///   empty. When the feed supplied a parseable published date it is replaced
///   by the canonical `YYYY-MM-DDTHH:MM:SS` form.
/// - `summary` is the summary with all markup removed, trimmed.
pub fn normalize(entry: &RawEntry, source: &str, country: &str) -> Article {
    let title = entry.get_or_default(EntryField::Title).trim().to_string();
    let link = entry.get_or_default(EntryField::Link).trim().to_string();

    let mut published = entry
        .get(EntryField::Published)
        .or_else(|| entry.get(EntryField::Updated))
        .unwrap_or(EntryField::Published.default_value())
        .trim()
        .to_string();
    if let Some(canonical) = entry.published_parsed.as_ref().and_then(TimeTuple::to_iso8601) {
        published = canonical;
    }

    let summary = html_to_text(entry.get_or_default(EntryField::Summary))
        .trim()
        .to_string();

    Article {
        source: source.to_string(),
        country: country.to_string(),
        title,
        link,
        published,
        summary,
    }
}

/// Extract the visible text of an HTML fragment.
///
/// Tags, attributes and the bodies of scripts and stylesheets are dropped and
/// character references are decoded. Text with no markup in it comes back
/// unchanged.
pub fn html_to_text(html: &str) -> String {
    if !html.contains(['<', '&']) {
        return html.to_string();
    }

    let fragment = Html::parse_fragment(html);
    let mut text = String::with_capacity(html.len());
    for node in fragment.root_element().descendants() {
        let Node::Text(chunk) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => HIDDEN_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if !hidden {
            text.push_str(chunk);
        }
    }
    text
}
