//! Tera decoration engine — wraps the serialized document for each platform.
//!
//! Decoration is deterministic: the context carries only the content snapshot
//! and the profile name, never timestamps, so unchanged content produces
//! byte-identical payloads and hash-gated writes stay no-ops.

use serde::Serialize;
use tera::Tera;

use crate::error::RenderError;
use crate::platform::PlatformKind;

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("claude.md.tera", include_str!("templates/claude.md.tera")),
    ("cursor.mdc.tera", include_str!("templates/cursor.mdc.tera")),
    ("windsurf.md.tera", include_str!("templates/windsurf.md.tera")),
    ("codex.md.tera", include_str!("templates/codex.md.tera")),
    ("gemini.md.tera", include_str!("templates/gemini.md.tera")),
    ("cline.md.tera", include_str!("templates/cline.md.tera")),
];

/// Serializable rendering payload.
#[derive(Debug, Clone, Serialize)]
struct DecorationContext<'a> {
    /// Serialized document snapshot, trailing whitespace trimmed.
    content: &'a str,
    /// Profile the snapshot came from.
    profile: &'a str,
}

/// Tera-based decorator for all platform kinds.
///
/// Uses embedded templates only. Create once with [`Decorator::new`] and
/// reuse.
pub struct Decorator {
    tera: Tera,
}

impl Decorator {
    /// Construct a new [`Decorator`] with embedded templates.
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        let items: Vec<(String, String)> = TPLS
            .iter()
            .map(|(name, content)| ((*name).to_string(), (*content).to_string()))
            .collect();
        tera.add_raw_templates(items)?;
        Ok(Decorator { tera })
    }

    /// Render the destination payload for `platform`.
    pub fn decorate(
        &self,
        platform: PlatformKind,
        content: &str,
        profile: &str,
    ) -> Result<String, RenderError> {
        let ctx = DecorationContext {
            content: content.trim_end(),
            profile,
        };
        let tera_ctx = tera::Context::from_serialize(&ctx).map_err(RenderError::Template)?;
        Ok(self.tera.render(platform.template_name(), &tera_ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
