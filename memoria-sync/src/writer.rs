//! Atomic writer and sync orchestration.
//!
//! ## Per-destination write — 6-step protocol
//!
//! 1. Decorate the content snapshot for the platform.
//! 2. SHA-256 hash the decorated payload (LF-normalized).
//! 3. Compare with the stored digest → skip if identical and the file
//!    still exists on disk.
//! 4. Write to `<path>.memoria.tmp`.
//! 5. Rename to final path (atomic on POSIX).
//! 6. Update the digest entry (caller saves the state).
//!
//! Steps run independently per platform: a failure is folded into that
//! platform's [`SyncResult`] and siblings proceed untouched.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};

use memoria_core::{codec, TemplateStore};
use memoria_render::{Decorator, PlatformKind};

use crate::error::{io_err, SyncError};
use crate::hash_store::{self, DigestMap};

// ---------------------------------------------------------------------------
// SyncResult
// ---------------------------------------------------------------------------

/// Per-destination outcome of one sync attempt. Ephemeral: produced once per
/// invocation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub platform: String,
    pub success: bool,
    pub message: String,
}

/// Outcome of an individual destination write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WriteOutcome {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped; payload matches the stored digest.
    Unchanged { path: PathBuf },
    /// Dry-run mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

/// Atomically write a single decorated payload and update the digest map.
///
/// The sync state is loaded before the call; the caller is responsible for
/// saving it after all platforms are processed.
pub(crate) fn atomic_write(
    path: &Path,
    content: &str,
    files: &mut DigestMap,
    dry_run: bool,
) -> Result<WriteOutcome, SyncError> {
    // Normalise line endings to LF before hashing and writing.
    let normalized = content.replace("\r\n", "\n");
    let content = normalized.as_str();

    let digest = {
        let mut h = Sha256::new();
        h.update(content.as_bytes());
        hex::encode(h.finalize())
    };

    let key = path.to_string_lossy().to_string();
    if let Some(stored) = files.get(&key) {
        // A destination deleted out from under the digest map still needs a
        // rewrite; the digest alone does not prove the file is on disk.
        if stored == &digest && path.exists() {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteOutcome::Unchanged {
                path: path.to_path_buf(),
            });
        }
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteOutcome::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let tmp = PathBuf::from(format!("{}.memoria.tmp", path.display()));
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    files.insert(key, digest);

    tracing::info!("wrote: {}", path.display());
    Ok(WriteOutcome::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Per-platform sync
// ---------------------------------------------------------------------------

/// Decorate and write one platform; every failure is folded into the result.
fn sync_one(
    decorator: &Decorator,
    platform: PlatformKind,
    target_root: &Path,
    snapshot: &str,
    profile: &str,
    files: &mut DigestMap,
    dry_run: bool,
) -> SyncResult {
    let path = platform.output_path(target_root);

    let payload = match decorator.decorate(platform, snapshot, profile) {
        Ok(payload) => payload,
        Err(err) => {
            return SyncResult {
                platform: platform.name().to_string(),
                success: false,
                message: format!("decoration failed: {err}"),
            }
        }
    };

    match atomic_write(&path, &payload, files, dry_run) {
        Ok(WriteOutcome::Written { path }) => SyncResult {
            platform: platform.name().to_string(),
            success: true,
            message: format!("wrote {}", path.display()),
        },
        Ok(WriteOutcome::Unchanged { path }) => SyncResult {
            platform: platform.name().to_string(),
            success: true,
            message: format!("unchanged {}", path.display()),
        },
        Ok(WriteOutcome::WouldWrite { path }) => SyncResult {
            platform: platform.name().to_string(),
            success: true,
            message: format!("[dry-run] would write {}", path.display()),
        },
        Err(err) => SyncResult {
            platform: platform.name().to_string(),
            success: false,
            message: err.to_string(),
        },
    }
}

/// The content snapshot a sync call operates on, captured once at call time.
fn snapshot_content(store: &TemplateStore, content: Option<&str>) -> String {
    match content {
        Some(text) => text.to_string(),
        None => codec::render_document(store.template()),
    }
}

// ---------------------------------------------------------------------------
// sync_all
// ---------------------------------------------------------------------------

/// Fan the document out to every registered platform.
///
/// `content` defaults to the store's current document, serialized once as an
/// immutable snapshot. Returns exactly one [`SyncResult`] per platform in
/// [`PlatformKind::all`] order; a failing destination never aborts or rolls
/// back its siblings. The outer `Result` covers only sync-state I/O and the
/// decoration engine itself.
pub fn sync_all(
    store: &TemplateStore,
    target_root: &Path,
    content: Option<&str>,
    dry_run: bool,
) -> Result<Vec<SyncResult>, SyncError> {
    let snapshot = snapshot_content(store, content);
    let decorator = Decorator::new()?;
    let mut state = hash_store::load_at(store.home(), store.profile())?;

    let mut results = Vec::with_capacity(PlatformKind::all().len());
    for platform in PlatformKind::all() {
        results.push(sync_one(
            &decorator,
            *platform,
            target_root,
            &snapshot,
            store.profile(),
            &mut state.files,
            dry_run,
        ));
    }

    // Save the updated sync state (skipped in dry-run mode).
    if !dry_run {
        state.synced_at = Utc::now();
        hash_store::save_at(store.home(), store.profile(), &state)?;
    }

    Ok(results)
}

// ---------------------------------------------------------------------------
// sync_platform
// ---------------------------------------------------------------------------

/// Sync a single named platform.
///
/// An unrecognized name yields a failed [`SyncResult`], never an error.
pub fn sync_platform(
    store: &TemplateStore,
    target_root: &Path,
    name: &str,
    dry_run: bool,
) -> Result<SyncResult, SyncError> {
    let Some(platform) = PlatformKind::from_name(name) else {
        return Ok(SyncResult {
            platform: name.to_string(),
            success: false,
            message: format!("unknown platform '{name}'"),
        });
    };

    let snapshot = snapshot_content(store, None);
    let decorator = Decorator::new()?;
    let mut state = hash_store::load_at(store.home(), store.profile())?;

    let result = sync_one(
        &decorator,
        platform,
        target_root,
        &snapshot,
        store.profile(),
        &mut state.files,
        dry_run,
    );

    if !dry_run {
        state.synced_at = Utc::now();
        hash_store::save_at(store.home(), store.profile(), &state)?;
    }

    Ok(result)
}

/// Static, ordered list of registered platform identifiers.
pub fn platforms() -> Vec<String> {
    PlatformKind::all()
        .iter()
        .map(|p| p.name().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
