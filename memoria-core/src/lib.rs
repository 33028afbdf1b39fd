//! Memoria core library — document model, codec, template store, presets.
//!
//! Public API surface:
//! - [`types`] — [`Document`], [`Section`], [`Item`] and name newtypes
//! - [`codec`] — plain-text parse / render for the memory format
//! - [`store`] — [`TemplateStore`] lifecycle and section-level mutation
//! - [`presets`] — named document snapshots
//! - [`config`] — install-wide consumer defaults
//! - [`error`] — [`StoreError`]

pub mod codec;
pub mod config;
pub mod error;
pub mod presets;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use store::TemplateStore;
pub use types::{Document, Item, PresetName, Section};
