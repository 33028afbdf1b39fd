//! Sync state — SHA-256-based idempotency tracking for destination files.
//!
//! Persists a `SyncState` JSON document at
//! `<home>/.memoria/<profile>/sync-state.json`.
//! Writes use the same atomic `.tmp` + rename pattern as the core store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use memoria_core::store::profile_dir_at;

use crate::error::{io_err, SyncError};

/// In-memory digest map: destination path string → last synced SHA-256 hex.
pub type DigestMap = HashMap<String, String>;

/// On-disk sync state payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncState {
    pub synced_at: DateTime<Utc>,
    pub files: DigestMap,
}

impl SyncState {
    fn empty() -> Self {
        Self {
            synced_at: Utc::now(),
            files: HashMap::new(),
        }
    }
}

/// Path to the sync state JSON for a profile, rooted at `home`.
///
/// `~/.memoria/<profile>/sync-state.json`
pub fn state_path_at(home: &Path, profile: &str) -> PathBuf {
    profile_dir_at(home, profile).join("sync-state.json")
}

/// Load the sync state for `profile`.
///
/// Returns an empty state if the file does not yet exist.
pub fn load_at(home: &Path, profile: &str) -> Result<SyncState, SyncError> {
    let path = state_path_at(home, profile);
    if !path.exists() {
        return Ok(SyncState::empty());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Save the sync state for `profile` atomically.
///
/// Writes to `<path>.tmp` then renames to `<path>`.
pub fn save_at(home: &Path, profile: &str, state: &SyncState) -> Result<(), SyncError> {
    let path = state_path_at(home, profile);
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("invalid sync state path"),
        ));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_state_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let state = load_at(tmp.path(), "default").unwrap();
        assert!(state.files.is_empty());
    }

    #[test]
    fn roundtrip_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut files = HashMap::new();
        files.insert("/target/CLAUDE.md".to_string(), "deadbeef".to_string());
        files.insert(
            "/target/.cursor/rules/memory.mdc".to_string(),
            "cafebabe".to_string(),
        );
        let state = SyncState {
            synced_at: Utc::now(),
            files,
        };

        save_at(tmp.path(), "default", &state).unwrap();
        let loaded = load_at(tmp.path(), "default").unwrap();
        assert_eq!(loaded.files, state.files);
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let tmp = TempDir::new().unwrap();
        let state = SyncState::empty();
        save_at(tmp.path(), "default", &state).unwrap();
        let tmp_path = state_path_at(tmp.path(), "default").with_extension("json.tmp");
        assert!(
            !tmp_path.exists(),
            "tmp file should be removed after atomic rename"
        );
    }

    #[test]
    fn profiles_have_independent_state() {
        let tmp = TempDir::new().unwrap();
        let mut state = SyncState::empty();
        state
            .files
            .insert("/t/CLAUDE.md".to_string(), "aa".to_string());
        save_at(tmp.path(), "work", &state).unwrap();

        let other = load_at(tmp.path(), "default").unwrap();
        assert!(other.files.is_empty());
    }
}
