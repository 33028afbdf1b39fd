//! Error types for memoria-sync.

use std::path::PathBuf;

use thiserror::Error;

use memoria_core::StoreError;
use memoria_render::RenderError;

/// All errors that can arise from sync operations.
///
/// Per-destination failures never surface here — they are captured in
/// [`crate::SyncResult`] entries. This enum covers store-wide state only:
/// the hash store, the decoration engine, and the core store itself.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the decoration engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An error from the core store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (hash store).
    #[error("sync state JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
