//! Template store — owns the live in-memory [`Document`].
//!
//! # Storage layout
//!
//! ```text
//! ~/.memoria/
//!   config.yaml                 (consumer defaults — see `config`)
//!   <profile>/
//!     memory.md                 (primary document — mode 0600)
//!     presets/<name>.md         (one file per preset — mode 0600)
//! ```
//!
//! # API pattern
//!
//! Path helpers have two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at` or
//! [`TemplateStore::open_at`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::codec;
use crate::error::{io_err, StoreError};
use crate::presets;
use crate::types::{Document, Section};

/// Default profile name when none is configured.
pub const DEFAULT_PROFILE: &str = "default";

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.memoria/` — pure, no I/O.
pub fn memoria_dir_at(home: &Path) -> PathBuf {
    home.join(".memoria")
}

/// `<home>/.memoria/<profile>/` — pure, no I/O.
pub fn profile_dir_at(home: &Path, profile: &str) -> PathBuf {
    memoria_dir_at(home).join(profile)
}

/// `<home>/.memoria/<profile>/memory.md` — pure, no I/O.
pub fn memory_path_at(home: &Path, profile: &str) -> PathBuf {
    profile_dir_at(home, profile).join("memory.md")
}

/// `<home>/.memoria/<profile>/presets/` — pure, no I/O.
pub fn presets_dir_at(home: &Path, profile: &str) -> PathBuf {
    profile_dir_at(home, profile).join("presets")
}

pub(crate) fn home() -> Result<PathBuf, StoreError> {
    dirs::home_dir().ok_or(StoreError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// 2. Atomic text writes
// ---------------------------------------------------------------------------

/// Atomically write `text` to `path`: parent dirs (0700) → `.tmp` sibling →
/// `chmod 0600` → rename. The `.tmp` sibling stays on the same filesystem, so
/// the rename never crosses devices.
pub(crate) fn write_text_atomic(path: &Path, text: &str) -> Result<(), StoreError> {
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("path has no parent directory"),
        ));
    };
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        set_dir_permissions(dir)?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!("{file_name}.tmp"));

    std::fs::write(&tmp, text).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// 3. TemplateStore
// ---------------------------------------------------------------------------

/// Owns the live document for one profile and mediates load/save against
/// backing storage.
///
/// Lifecycle is Uninitialized → Loaded, once per instance: construct with
/// [`TemplateStore::open`]/[`TemplateStore::open_at`], then call
/// [`TemplateStore::initialize`]. Mutating calls must be externally
/// serialized by the caller; the store does no internal locking.
#[derive(Debug)]
pub struct TemplateStore {
    home: PathBuf,
    profile: String,
    document: Document,
}

impl TemplateStore {
    /// Construct a store rooted at the user's home directory.
    pub fn open(profile: &str) -> Result<Self, StoreError> {
        Ok(Self::open_at(&home()?, profile))
    }

    /// Construct a store rooted at an explicit `home` (tests use `TempDir`).
    pub fn open_at(home: &Path, profile: &str) -> Self {
        Self {
            home: home.to_path_buf(),
            profile: profile.to_string(),
            document: Document::empty(),
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn profile_dir(&self) -> PathBuf {
        profile_dir_at(&self.home, &self.profile)
    }

    pub fn memory_path(&self) -> PathBuf {
        memory_path_at(&self.home, &self.profile)
    }

    pub fn presets_dir(&self) -> PathBuf {
        presets_dir_at(&self.home, &self.profile)
    }

    /// Idempotently ensure backing storage exists and load the document.
    ///
    /// Absence, unreadable bytes, and unusable decodes (zero sections) all
    /// fall back to the default document, which is persisted. Bundled default
    /// presets are installed into the preset directory, skipping names that
    /// already exist. Only directory-creation and persist failures propagate.
    pub fn initialize(&mut self) -> Result<(), StoreError> {
        let presets_dir = self.presets_dir();
        if !presets_dir.exists() {
            std::fs::create_dir_all(&presets_dir).map_err(|e| io_err(&presets_dir, e))?;
            set_dir_permissions(&self.profile_dir())?;
            set_dir_permissions(&presets_dir)?;
        }

        let usable = matches!(self.load_template(), Ok(true) if !self.document.sections.is_empty());
        if !usable {
            self.document = Document::default_template();
            self.save_template()?;
        }

        presets::install_default_presets(self)?;
        Ok(())
    }

    /// Read and decode `memory.md`, replacing the in-memory document.
    ///
    /// `Ok(false)` means the file is absent, a distinct non-error signal
    /// used by [`TemplateStore::initialize`]. Other I/O failures propagate.
    pub fn load_template(&mut self) -> Result<bool, StoreError> {
        let path = self.memory_path();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(io_err(&path, e)),
        };
        self.document = codec::parse_document(&text);
        Ok(true)
    }

    /// Read view of the current document.
    pub fn template(&self) -> &Document {
        &self.document
    }

    /// Case-insensitive section lookup; pure read.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.document.section(name)
    }

    /// Decode `fragment` as a section body and upsert it under `name`.
    ///
    /// A fragment with neither description nor items returns `Ok(false)` and
    /// leaves both memory and disk untouched. Otherwise the section is
    /// replaced wholesale (or appended) and the whole document is persisted.
    pub fn update_section(&mut self, name: &str, fragment: &str) -> Result<bool, StoreError> {
        let (description, items) = codec::parse_section_body(fragment);
        if description.is_none() && items.is_empty() {
            return Ok(false);
        }
        self.document.upsert_section(name, description, items);
        self.save_template()?;
        Ok(true)
    }

    /// Decode `full_text` as a full document and replace the current one.
    ///
    /// Zero decoded sections → `Ok(false)`, no mutation.
    pub fn update_template(&mut self, full_text: &str) -> Result<bool, StoreError> {
        let document = codec::parse_document(full_text);
        if document.sections.is_empty() {
            return Ok(false);
        }
        self.document = document;
        self.save_template()?;
        Ok(true)
    }

    /// Serialize and atomically write the in-memory document.
    pub fn save_template(&self) -> Result<(), StoreError> {
        write_text_atomic(&self.memory_path(), &codec::render_document(&self.document))
    }

    /// Replace the live document and persist it (preset load boundary).
    pub(crate) fn replace_document(&mut self, document: Document) -> Result<(), StoreError> {
        self.document = document;
        self.save_template()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
