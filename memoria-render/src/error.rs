//! Error types for memoria-render.

use thiserror::Error;

/// All errors that can arise from platform decoration.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template compilation or rendering failure.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}
