//! [`PlatformKind`] — the closed registry of sync destinations.
//!
//! # Path mapping (official docs of each tool)
//!
//! | Platform | Destination path              |
//! |----------|-------------------------------|
//! | Claude   | `CLAUDE.md`                   |
//! | Cursor   | `.cursor/rules/memory.mdc`    |
//! | Windsurf | `.windsurf/rules/memory.md`   |
//! | Codex    | `AGENTS.md`                   |
//! | Gemini   | `GEMINI.md`                   |
//! | Cline    | `.clinerules/memory.md`       |

use std::fmt;
use std::path::{Path, PathBuf};

/// All supported destination platforms, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    Claude,
    Cursor,
    Windsurf,
    Codex,
    Gemini,
    Cline,
}

impl PlatformKind {
    /// All platform variants in a stable order; sync results are reported in
    /// this order.
    pub fn all() -> &'static [PlatformKind] {
        &[
            PlatformKind::Claude,
            PlatformKind::Cursor,
            PlatformKind::Windsurf,
            PlatformKind::Codex,
            PlatformKind::Gemini,
            PlatformKind::Cline,
        ]
    }

    /// Stable lowercase identifier.
    pub fn name(&self) -> &'static str {
        match self {
            PlatformKind::Claude => "claude",
            PlatformKind::Cursor => "cursor",
            PlatformKind::Windsurf => "windsurf",
            PlatformKind::Codex => "codex",
            PlatformKind::Gemini => "gemini",
            PlatformKind::Cline => "cline",
        }
    }

    /// Case-insensitive reverse lookup; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<PlatformKind> {
        PlatformKind::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Embedded template rendered for this platform.
    pub fn template_name(&self) -> &'static str {
        match self {
            PlatformKind::Claude => "claude.md.tera",
            PlatformKind::Cursor => "cursor.mdc.tera",
            PlatformKind::Windsurf => "windsurf.md.tera",
            PlatformKind::Codex => "codex.md.tera",
            PlatformKind::Gemini => "gemini.md.tera",
            PlatformKind::Cline => "cline.md.tera",
        }
    }

    /// Destination path for this platform, relative to the sync target root.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        match self {
            PlatformKind::Claude => root.join("CLAUDE.md"),
            PlatformKind::Cursor => root.join(".cursor").join("rules").join("memory.mdc"),
            PlatformKind::Windsurf => root.join(".windsurf").join("rules").join("memory.md"),
            PlatformKind::Codex => root.join("AGENTS.md"),
            PlatformKind::Gemini => root.join("GEMINI.md"),
            PlatformKind::Cline => root.join(".clinerules").join("memory.md"),
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
