//! # memoria-server
//!
//! JSON-lines tool server exposing the memory document over stdio.
//!
//! Each request is a single JSON object on one line, tagged with an `op`
//! field; each response is a single [`protocol::ToolResponse`] line. Malformed
//! input yields an error response and the loop keeps serving. An optional
//! watcher re-syncs destinations whenever `memory.md` changes on disk.

pub mod cache;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod runtime;

pub use dispatch::ServerState;
pub use error::ServerError;
pub use protocol::{ToolRequest, ToolResponse};
