//! JSON newline-delimited request/response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One request line, tagged by `op`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ToolRequest {
    /// Serialized form of the whole live document.
    GetTemplate,
    /// One section by case-insensitive title.
    GetSection { name: String },
    /// Upsert a section from a body fragment.
    UpdateSection { name: String, content: String },
    /// Replace the whole document from serialized text.
    UpdateTemplate { content: String },
    /// Names of saved presets.
    ListPresets,
    /// Replace the live document from a preset.
    LoadPreset { name: String },
    /// Snapshot the live document under a preset name.
    CreatePreset { name: String },
    /// Registered platform identifiers.
    ListPlatforms,
    /// Fan out to every platform. `content` overrides the live document.
    SyncAll {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default)]
        dry_run: bool,
    },
    /// Sync one platform by name.
    SyncPlatform {
        name: String,
        #[serde(default)]
        dry_run: bool,
    },
}

/// One response line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
