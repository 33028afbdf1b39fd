//! # memoria-sync
//!
//! Hash-gated atomic writer and multi-platform sync orchestration.
//!
//! Call [`sync_all`] to fan the serialized memory document out to every
//! registered platform, or [`sync_platform`] for a single destination. Each
//! platform fails independently; outcomes come back as one [`SyncResult`]
//! per platform and a failure never aborts or rolls back siblings.

pub mod diff;
pub mod error;
pub mod hash_store;
pub mod status;
pub mod writer;

pub use error::SyncError;
pub use status::{PlatformStatus, SyncSignal};
pub use writer::{platforms, sync_all, sync_platform, SyncResult};
