//! Line-oriented codec for the memory document format.
//!
//! # Grammar (tolerant — malformed lines are skipped, never fatal)
//!
//! ```text
//! # Memory              anchor line, recognized only in the preamble
//! # <title>             section header (single '#')
//! ## <description>      section description; last occurrence wins
//! -~- <key>: <value>    item line (fixed 3-char marker)
//! ```
//!
//! Blank lines and anything else are ignored. Everything before the first
//! section header is preamble and discarded. The codec never rejects input;
//! "unusable" results are a [`crate::store::TemplateStore`] policy.

use crate::types::{Document, Item, Section};

/// Fixed top-level header; always the first line of rendered output.
pub const ANCHOR: &str = "# Memory";

/// Fixed 3-character item marker.
pub const ITEM_MARKER: &str = "-~-";

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

/// Decode a full document. Infallible.
pub fn parse_document(input: &str) -> Document {
    let mut doc = Document::empty();
    let mut current: Option<usize> = None;

    for raw in input.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        // Anchor is only special in the preamble; after the first section a
        // header spelled like the anchor is an ordinary section.
        if doc.sections.is_empty() && line == ANCHOR {
            continue;
        }

        if let Some(rest) = line.strip_prefix("##") {
            if let Some(idx) = current {
                let text = rest.trim();
                if !text.is_empty() {
                    // Repeated description within one section: last wins.
                    doc.sections[idx].description = Some(text.to_string());
                }
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix('#') {
            let title = rest.trim();
            if title.is_empty() {
                continue;
            }
            current = Some(doc.select_or_insert(title));
            continue;
        }

        if let Some(rest) = line.strip_prefix(ITEM_MARKER) {
            let Some(idx) = current else { continue };
            if let Some(item) = parse_item(rest) {
                doc.sections[idx].items.push(item);
            }
            continue;
        }
        // Anything else: ignored.
    }

    doc
}

/// Decode a section body fragment (description + items, no title).
///
/// Single-`#` header lines inside a fragment are skipped.
pub fn parse_section_body(input: &str) -> (Option<String>, Vec<Item>) {
    let mut description = None;
    let mut items = Vec::new();

    for raw in input.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("##") {
            let text = rest.trim();
            if !text.is_empty() {
                description = Some(text.to_string());
            }
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix(ITEM_MARKER) {
            if let Some(item) = parse_item(rest) {
                items.push(item);
            }
        }
    }

    (description, items)
}

/// `<key>: <value>` after the marker; no separator or empty key → skipped.
fn parse_item(rest: &str) -> Option<Item> {
    let (key, value) = rest.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some(Item::new(key, value.trim()))
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

/// Encode a document: anchor line, then per section a title line, optional
/// description line, one item line per item, separated by blank lines.
pub fn render_document(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str(ANCHOR);
    out.push('\n');

    for section in &doc.sections {
        out.push('\n');
        out.push_str(&render_section(section));
    }

    out
}

/// Encode one section: title line, optional description line, one item line
/// per item. No anchor line.
pub fn render_section(section: &Section) -> String {
    let mut out = String::new();
    out.push_str("# ");
    out.push_str(&section.title);
    out.push('\n');
    if let Some(description) = &section.description {
        out.push_str("## ");
        out.push_str(description);
        out.push('\n');
    }
    for item in &section.items {
        out.push_str(ITEM_MARKER);
        out.push(' ');
        out.push_str(&item.key);
        out.push_str(": ");
        out.push_str(&item.value);
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_document() {
        let text = "# Memory\n\n# User Information\n## Basics\n-~- name: Ada\n";
        let doc = parse_document(text);
        assert_eq!(doc.sections.len(), 1);
        let section = &doc.sections[0];
        assert_eq!(section.title, "User Information");
        assert_eq!(section.description.as_deref(), Some("Basics"));
        assert_eq!(section.items, vec![Item::new("name", "Ada")]);
    }

    #[test]
    fn anchor_only_consumed_in_preamble() {
        let text = "# Memory\n\n# Projects\n-~- active: memoria\n\n# Memory\n-~- note: section named like the anchor\n";
        let doc = parse_document(text);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[1].title, "Memory");
        assert_eq!(doc.sections[1].items.len(), 1);
    }

    #[test]
    fn preamble_content_is_discarded() {
        let text = "stray text\n-~- orphan: item\n## orphan description\n# First\n-~- k: v\n";
        let doc = parse_document(text);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "First");
        assert_eq!(doc.sections[0].description, None);
        assert_eq!(doc.sections[0].items.len(), 1);
    }

    #[test]
    fn repeated_description_last_wins() {
        let text = "# Prefs\n## first\n## second\n";
        let doc = parse_document(text);
        assert_eq!(doc.sections[0].description.as_deref(), Some("second"));
    }

    #[test]
    fn duplicate_headers_merge_into_one_section() {
        let text = "# Prefs\n-~- a: 1\n\n# PREFS\n-~- b: 2\n";
        let doc = parse_document(text);
        assert_eq!(doc.sections.len(), 1, "case-insensitive title uniqueness");
        assert_eq!(doc.sections[0].items.len(), 2);
    }

    #[test]
    fn marker_without_separator_is_skipped() {
        let text = "# S\n-~- no separator here\n-~- ok: yes\n";
        let doc = parse_document(text);
        assert_eq!(doc.sections[0].items, vec![Item::new("ok", "yes")]);
    }

    #[test]
    fn value_keeps_later_colons() {
        let text = "# S\n-~- url: https://example.com: notes\n";
        let doc = parse_document(text);
        assert_eq!(
            doc.sections[0].items,
            vec![Item::new("url", "https://example.com: notes")]
        );
    }

    #[test]
    fn duplicate_item_keys_are_kept_in_order() {
        let text = "# S\n-~- k: first\n-~- k: second\n";
        let doc = parse_document(text);
        let items = &doc.sections[0].items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].value, "first");
        assert_eq!(items[1].value, "second");
    }

    #[test]
    fn render_empty_document_keeps_anchor() {
        assert_eq!(render_document(&Document::empty()), "# Memory\n");
    }

    #[test]
    fn render_then_parse_stabilizes_after_one_pass() {
        let text = "junk preamble\n# A\n## described\n-~- k: v\n# B\n-~- x: 1\n-~- x: 2\n";
        let once = render_document(&parse_document(text));
        let twice = render_document(&parse_document(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn section_body_fragment() {
        let (description, items) = parse_section_body("## d\n-~- k: v\n# ignored title\n");
        assert_eq!(description.as_deref(), Some("d"));
        assert_eq!(items, vec![Item::new("k", "v")]);
    }

    #[test]
    fn empty_fragment_has_no_content() {
        let (description, items) = parse_section_body("not a fragment\n\n");
        assert!(description.is_none());
        assert!(items.is_empty());
    }
}
