//! Round-trip property tests for the memory codec.
//!
//! Each `#[case]` is isolated — no shared state.

use memoria_core::codec::{parse_document, render_document};
use memoria_core::types::{Document, Item};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn empty_document() -> Document {
    Document::empty()
}

fn minimal_document() -> Document {
    let mut doc = Document::empty();
    doc.upsert_section("User Information", None, vec![Item::new("name", "Ada")]);
    doc
}

fn full_document() -> Document {
    let mut doc = Document::empty();
    doc.upsert_section(
        "User Information",
        Some("Basic details about the user".to_string()),
        vec![
            Item::new("name", "Ada Lovelace"),
            Item::new("role", "engineer"),
        ],
    );
    doc.upsert_section(
        "Preferences",
        Some("Standing preferences".to_string()),
        vec![Item::new("tone", "direct")],
    );
    doc.upsert_section("Notes", None, vec![]);
    doc
}

fn unicode_document() -> Document {
    let mut doc = Document::empty();
    doc.upsert_section(
        "言語",
        Some("日本語・한국어・العربية".to_string()),
        vec![Item::new("emoji", "🚀 rockets & <angle> \"quotes\"")],
    );
    doc
}

fn duplicate_keys_document() -> Document {
    let mut doc = Document::empty();
    doc.upsert_section(
        "Links",
        None,
        vec![
            Item::new("url", "https://a.example"),
            Item::new("url", "https://b.example"),
            Item::new("url", "https://a.example"),
        ],
    );
    doc
}

// ---------------------------------------------------------------------------
// Parameterised round-trip tests
// ---------------------------------------------------------------------------

#[rstest]
#[case("empty", empty_document())]
#[case("minimal", minimal_document())]
#[case("all_fields", full_document())]
#[case("unicode_strings", unicode_document())]
#[case("duplicate_keys", duplicate_keys_document())]
fn render_parse_render_is_stable(#[case] label: &str, #[case] doc: Document) {
    let rendered = render_document(&doc);
    let reparsed = parse_document(&rendered);
    assert_eq!(
        render_document(&reparsed),
        rendered,
        "[{label}] render∘parse must stabilize after one pass"
    );
}

#[rstest]
#[case("minimal", minimal_document())]
#[case("all_fields", full_document())]
#[case("unicode_strings", unicode_document())]
#[case("duplicate_keys", duplicate_keys_document())]
fn parse_recovers_api_built_documents(#[case] label: &str, #[case] doc: Document) {
    let reparsed = parse_document(&render_document(&doc));
    assert_eq!(reparsed, doc, "[{label}] semantic equality through the codec");
}

#[rstest]
#[case("")]
#[case("   \n\n\t\n")]
#[case("no markers at all, just prose")]
#[case("-~- orphan: item before any section")]
#[case("## orphan description")]
fn unusable_input_yields_zero_sections(#[case] input: &str) {
    assert!(parse_document(input).sections.is_empty());
}

#[test]
fn rendered_output_always_starts_with_anchor() {
    for doc in [empty_document(), full_document()] {
        assert!(render_document(&doc).starts_with("# Memory\n"));
    }
}
