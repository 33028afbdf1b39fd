//! Per-platform staleness signal detection.
//!
//! Signal precedence per destination:
//! 1. `NeverSynced` (no digest entry recorded)
//! 2. `Missing` (digest recorded but file absent on disk)
//! 3. `Stale` (on-disk content differs from what sync would write)
//! 4. `Current`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use memoria_core::{codec, TemplateStore};
use memoria_render::{Decorator, PlatformKind};

use crate::{diff::normalize_line_endings, error::io_err, hash_store, SyncError};

/// Staleness classification for one destination file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncSignal {
    NeverSynced,
    Current,
    Stale,
    Missing,
}

impl SyncSignal {
    pub fn label(&self) -> &'static str {
        match self {
            SyncSignal::NeverSynced => "never synced",
            SyncSignal::Current => "current",
            SyncSignal::Stale => "stale",
            SyncSignal::Missing => "missing",
        }
    }
}

/// Status of one registered platform destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformStatus {
    pub platform: String,
    pub path: PathBuf,
    pub signal: SyncSignal,
}

/// Classify every platform destination under `target_root`.
///
/// Comparison is content-based: a destination is `Current` only when its
/// on-disk bytes match what a sync would decorate and write right now.
pub fn check(store: &TemplateStore, target_root: &Path) -> Result<Vec<PlatformStatus>, SyncError> {
    let snapshot = codec::render_document(store.template());
    let decorator = Decorator::new()?;
    let state = hash_store::load_at(store.home(), store.profile())?;

    let mut statuses = Vec::with_capacity(PlatformKind::all().len());
    for platform in PlatformKind::all() {
        let path = platform.output_path(target_root);
        let key = path.to_string_lossy().to_string();

        let signal = if !state.files.contains_key(&key) {
            SyncSignal::NeverSynced
        } else {
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    let decorated =
                        decorator.decorate(*platform, &snapshot, store.profile())?;
                    if normalize_line_endings(&content) == normalize_line_endings(&decorated) {
                        SyncSignal::Current
                    } else {
                        SyncSignal::Stale
                    }
                }
                Err(err) if err.kind() == ErrorKind::NotFound => SyncSignal::Missing,
                Err(err) => return Err(io_err(&path, err)),
            }
        };

        statuses.push(PlatformStatus {
            platform: platform.name().to_string(),
            path,
            signal,
        });
    }

    Ok(statuses)
}

/// Format age from the sync state timestamp as a compact suffix.
pub fn format_datetime_age(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let age = now.signed_duration_since(timestamp).num_seconds().max(0) as u64;
    format_seconds(age)
}

fn format_seconds(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use chrono::Duration as ChronoDuration;
    use memoria_core::store::DEFAULT_PROFILE;
    use tempfile::TempDir;

    use crate::sync_all;

    fn initialized_store() -> (TempDir, TemplateStore) {
        let home = TempDir::new().expect("home");
        let mut store = TemplateStore::open_at(home.path(), DEFAULT_PROFILE);
        store.initialize().expect("initialize");
        (home, store)
    }

    #[test]
    fn all_never_synced_before_first_sync() {
        let (_home, store) = initialized_store();
        let target = TempDir::new().expect("target");

        let statuses = check(&store, target.path()).expect("check");
        assert_eq!(statuses.len(), PlatformKind::all().len());
        assert!(statuses
            .iter()
            .all(|s| s.signal == SyncSignal::NeverSynced));
    }

    #[test]
    fn all_current_after_sync() {
        let (_home, store) = initialized_store();
        let target = TempDir::new().expect("target");
        sync_all(&store, target.path(), None, false).expect("sync");

        let statuses = check(&store, target.path()).expect("check");
        assert!(statuses.iter().all(|s| s.signal == SyncSignal::Current));
    }

    #[test]
    fn edited_destination_is_stale() {
        let (_home, store) = initialized_store();
        let target = TempDir::new().expect("target");
        sync_all(&store, target.path(), None, false).expect("sync");

        fs::write(target.path().join("CLAUDE.md"), "local edit\n").expect("edit");

        let statuses = check(&store, target.path()).expect("check");
        let claude = statuses.iter().find(|s| s.platform == "claude").unwrap();
        assert_eq!(claude.signal, SyncSignal::Stale);

        let codex = statuses.iter().find(|s| s.platform == "codex").unwrap();
        assert_eq!(codex.signal, SyncSignal::Current);
    }

    #[test]
    fn deleted_destination_is_missing() {
        let (_home, store) = initialized_store();
        let target = TempDir::new().expect("target");
        sync_all(&store, target.path(), None, false).expect("sync");

        fs::remove_file(target.path().join("AGENTS.md")).expect("remove");

        let statuses = check(&store, target.path()).expect("check");
        let codex = statuses.iter().find(|s| s.platform == "codex").unwrap();
        assert_eq!(codex.signal, SyncSignal::Missing);
    }

    #[test]
    fn document_edit_makes_destinations_stale() {
        let (_home, mut store) = initialized_store();
        let target = TempDir::new().expect("target");
        sync_all(&store, target.path(), None, false).expect("sync");

        store
            .update_section("Preferences", "## Updated prefs\n-~- tone: direct")
            .expect("update");

        let statuses = check(&store, target.path()).expect("check");
        assert!(statuses.iter().all(|s| s.signal == SyncSignal::Stale));
    }

    #[test]
    fn ages_are_compact() {
        assert_eq!(format_datetime_age(Utc::now()), "0s");
        assert_eq!(
            format_datetime_age(Utc::now() - ChronoDuration::seconds(65)),
            "1m"
        );
        assert_eq!(
            format_datetime_age(Utc::now() - ChronoDuration::hours(3)),
            "3h"
        );
        assert_eq!(
            format_datetime_age(Utc::now() - ChronoDuration::days(2)),
            "2d"
        );
    }

    #[test]
    fn signal_labels() {
        assert_eq!(SyncSignal::NeverSynced.label(), "never synced");
        assert_eq!(SyncSignal::Current.label(), "current");
        assert_eq!(SyncSignal::Stale.label(), "stale");
        assert_eq!(SyncSignal::Missing.label(), "missing");
    }
}
