//! Error types for memoria-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from store, preset and config operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization/deserialization error (config file).
    #[error("config YAML error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.memoria/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// Preset names map directly to file stems; path fragments are rejected.
    #[error("invalid preset name '{name}'")]
    InvalidPresetName { name: String },
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
