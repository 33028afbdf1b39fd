//! Preset repository — named, persisted snapshots of a full document.
//!
//! Presets live next to the primary document
//! (`<home>/.memoria/<profile>/presets/<name>.md`) and are independent of the
//! live document except at the load/create boundaries.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::codec;
use crate::error::{io_err, StoreError};
use crate::store::{write_text_atomic, TemplateStore};
use crate::types::PresetName;

// ---------------------------------------------------------------------------
// Bundled defaults — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const BUNDLED: &[(&str, &str)] = &[
    ("default", include_str!("defaults/default.md")),
    ("coding", include_str!("defaults/coding.md")),
    ("writing", include_str!("defaults/writing.md")),
];

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Enumerate valid preset names: `.md` files in the preset directory whose
/// content decodes to a usable document. Unreadable or unusable entries are
/// skipped. Result order is stable (sorted by name).
pub fn list_presets(store: &TemplateStore) -> Result<Vec<PresetName>, StoreError> {
    let dir = store.presets_dir();
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
        let entry = entry.map_err(|e| io_err(&dir, e))?;
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }
        let Ok(text) = std::fs::read_to_string(&path) else {
            continue;
        };
        if codec::parse_document(&text).sections.is_empty() {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(PresetName::from(stem));
        }
    }
    names.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(names)
}

/// Load the named preset into the store's live document and persist it.
///
/// `Ok(false)`, with no mutation, when the preset is missing, has an invalid
/// name, or does not decode into a usable document.
pub fn load_preset(store: &mut TemplateStore, name: &str) -> Result<bool, StoreError> {
    let Ok(path) = preset_path(store, name) else {
        return Ok(false);
    };
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(io_err(&path, e)),
    };
    let document = codec::parse_document(&text);
    if document.sections.is_empty() {
        return Ok(false);
    }
    store.replace_document(document)?;
    Ok(true)
}

/// Snapshot the store's current document under `name`, creating or
/// overwriting the preset file. Never mutates the live document.
pub fn create_preset(store: &TemplateStore, name: &str) -> Result<(), StoreError> {
    let path = preset_path(store, name)?;
    write_text_atomic(&path, &codec::render_document(store.template()))
}

/// Install the bundled presets, skipping any name that already exists.
pub(crate) fn install_default_presets(store: &TemplateStore) -> Result<(), StoreError> {
    for (name, text) in BUNDLED {
        let path = preset_path(store, name)?;
        if path.exists() {
            continue;
        }
        write_text_atomic(&path, text)?;
    }
    Ok(())
}

/// `<presets>/<name>.md` after validating that `name` is a bare file stem.
fn preset_path(store: &TemplateStore, name: &str) -> Result<PathBuf, StoreError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(StoreError::InvalidPresetName {
            name: name.to_string(),
        });
    }
    Ok(store.presets_dir().join(format!("{name}.md")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
