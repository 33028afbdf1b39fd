//! Dry-run unified diff support for `memoria diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use memoria_core::{codec, TemplateStore};
use memoria_render::{Decorator, PlatformKind};

use crate::{error::io_err, SyncError};

/// A single decorated file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub platform: String,
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Decorate what `sync` would write and compare it to current on-disk content.
///
/// No files are written. Platforms whose decorated payload matches the disk
/// content exactly are omitted from the result.
pub fn diff_platforms(
    store: &TemplateStore,
    target_root: &Path,
) -> Result<Vec<FileDiff>, SyncError> {
    let snapshot = codec::render_document(store.template());
    let decorator = Decorator::new()?;

    let mut diffs = Vec::new();
    for platform in PlatformKind::all() {
        let path = platform.output_path(target_root);
        let decorated = decorator.decorate(*platform, &snapshot, store.profile())?;
        let decorated = normalize_line_endings(&decorated);
        let existing = read_existing_or_empty(&path)?;
        if existing == decorated {
            continue;
        }

        let relative = path.strip_prefix(target_root).unwrap_or(path.as_path());
        let old_header = format!("a/{}", relative.display());
        let new_header = format!("b/{}", relative.display());
        let unified = TextDiff::from_lines(&existing, &decorated)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            platform: platform.name().to_string(),
            path,
            unified_diff: unified,
        });
    }

    Ok(diffs)
}

pub(crate) fn read_existing_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

pub(crate) fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}
