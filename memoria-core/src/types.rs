//! Domain types for the memoria document model.
//!
//! A [`Document`] is an ordered sequence of [`Section`]s; items within a
//! section are ordered key/value pairs. Section titles are unique within a
//! document under case-insensitive comparison — lookups and upserts all go
//! through [`Document::section`] / [`Document::upsert_section`] to keep that
//! invariant.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a persisted preset (derived from its file stem).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetName(pub String);

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PresetName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PresetName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One key/value entry inside a section.
///
/// Duplicate keys are legal and preserved as distinct entries in order; no
/// layer of the system deduplicates items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub key: String,
    pub value: String,
}

impl Item {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A named block with an optional description and ordered items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            items: Vec::new(),
        }
    }

    /// Case-insensitive title comparison used for every section lookup.
    pub fn title_matches(&self, name: &str) -> bool {
        self.title.to_lowercase() == name.to_lowercase()
    }
}

/// The full structured memory template — an ordered sequence of sections.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Document {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Case-insensitive section lookup.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title_matches(name))
    }

    /// Mutable counterpart of [`Document::section`].
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.title_matches(name))
    }

    /// Index of the section matching `name`, inserting an empty section
    /// titled `name` at the end when no match exists.
    pub fn select_or_insert(&mut self, name: &str) -> usize {
        if let Some(idx) = self.sections.iter().position(|s| s.title_matches(name)) {
            return idx;
        }
        self.sections.push(Section::new(name));
        self.sections.len() - 1
    }

    /// Replace the matching section's description and items wholesale, or
    /// append a new section titled `name`. The existing title's casing is
    /// kept on replacement.
    pub fn upsert_section(&mut self, name: &str, description: Option<String>, items: Vec<Item>) {
        match self.section_mut(name) {
            Some(section) => {
                section.description = description;
                section.items = items;
            }
            None => {
                let mut section = Section::new(name);
                section.description = description;
                section.items = items;
                self.sections.push(section);
            }
        }
    }

    /// The bootstrap document persisted by `initialize()` when no memory
    /// file exists yet.
    pub fn default_template() -> Self {
        let mut doc = Document::empty();
        doc.upsert_section(
            "User Information",
            Some("Basic details about the user".to_string()),
            vec![],
        );
        doc.upsert_section(
            "Preferences",
            Some("Standing preferences for how to respond".to_string()),
            vec![],
        );
        doc.upsert_section(
            "Formatting Rules",
            Some("Rules for formatting replies".to_string()),
            vec![],
        );
        doc
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(PresetName::from("daily").to_string(), "daily");
    }

    #[test]
    fn section_lookup_is_case_insensitive() {
        let mut doc = Document::empty();
        doc.upsert_section("User Information", None, vec![Item::new("name", "Ada")]);
        let upper = doc.section("User Information").expect("exact case");
        let lower = doc.section("user information").expect("lower case");
        assert_eq!(upper, lower);
    }

    #[test]
    fn upsert_replaces_without_duplicating() {
        let mut doc = Document::empty();
        doc.upsert_section("Preferences", Some("v1".to_string()), vec![]);
        doc.upsert_section(
            "PREFERENCES",
            Some("v2".to_string()),
            vec![Item::new("tone", "direct")],
        );
        assert_eq!(doc.sections.len(), 1);
        let section = &doc.sections[0];
        assert_eq!(section.title, "Preferences", "original casing kept");
        assert_eq!(section.description.as_deref(), Some("v2"));
        assert_eq!(section.items.len(), 1);
    }

    #[test]
    fn duplicate_item_keys_are_preserved() {
        let mut doc = Document::empty();
        doc.upsert_section(
            "Links",
            None,
            vec![Item::new("url", "a"), Item::new("url", "b")],
        );
        let items = &doc.section("Links").unwrap().items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].value, "a");
        assert_eq!(items[1].value, "b");
    }

    #[test]
    fn default_template_has_sections() {
        let doc = Document::default_template();
        assert!(!doc.sections.is_empty());
        assert!(doc.section("User Information").is_some());
    }
}
