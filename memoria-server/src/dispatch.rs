//! Request dispatch against the live store.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use memoria_core::{codec, presets, TemplateStore};
use memoria_sync::{platforms, sync_all, sync_platform};

use crate::cache::{NoopCache, ResponseCache};
use crate::protocol::{ToolRequest, ToolResponse};

/// Everything one serving loop owns: the live store, the sync target root,
/// and the response cache. Mutating ops are serialized by `&mut self`.
pub struct ServerState {
    store: TemplateStore,
    target_root: PathBuf,
    cache: Box<dyn ResponseCache>,
}

impl ServerState {
    pub fn new(store: TemplateStore, target_root: PathBuf) -> Self {
        Self {
            store,
            target_root,
            cache: Box::new(NoopCache),
        }
    }

    pub fn with_cache(mut self, cache: Box<dyn ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TemplateStore {
        &mut self.store
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Dispatch one request. Never fails: every error becomes an `ok: false`
    /// response so the serving loop keeps running.
    pub fn handle(&mut self, request: ToolRequest) -> ToolResponse {
        if let Some(key) = self.cache_key(&request) {
            if let Some(hit) = self.cache.get(&key) {
                tracing::debug!(key = %key, "cache hit");
                return ToolResponse::ok(hit);
            }
            let response = self.dispatch(request);
            if response.ok {
                if let Some(data) = &response.data {
                    self.cache.put(&key, data);
                }
            }
            return response;
        }

        let response = self.dispatch(request);
        if response.ok {
            self.cache.clear();
        }
        response
    }

    /// Cache keys cover read-only ops and bind to the current document, so a
    /// stale entry can never be served.
    fn cache_key(&self, request: &ToolRequest) -> Option<String> {
        let cacheable = matches!(
            request,
            ToolRequest::GetTemplate
                | ToolRequest::GetSection { .. }
                | ToolRequest::ListPresets
                | ToolRequest::ListPlatforms
        );
        if !cacheable {
            return None;
        }
        let req = serde_json::to_string(request).ok()?;
        let mut h = Sha256::new();
        h.update(codec::render_document(self.store.template()).as_bytes());
        Some(format!("{req}|{}", hex::encode(h.finalize())))
    }

    fn dispatch(&mut self, request: ToolRequest) -> ToolResponse {
        match request {
            ToolRequest::GetTemplate => ToolResponse::ok(json!({
                "content": codec::render_document(self.store.template()),
            })),

            ToolRequest::GetSection { name } => match self.store.section(&name) {
                Some(section) => match serde_json::to_value(section) {
                    Ok(value) => ToolResponse::ok(value),
                    Err(err) => ToolResponse::error(err.to_string()),
                },
                None => ToolResponse::error(format!("section '{name}' not found")),
            },

            ToolRequest::UpdateSection { name, content } => {
                match self.store.update_section(&name, &content) {
                    Ok(true) => ToolResponse::ok(json!({ "updated": name })),
                    Ok(false) => {
                        ToolResponse::error("section fragment has no usable content")
                    }
                    Err(err) => ToolResponse::error(err.to_string()),
                }
            }

            ToolRequest::UpdateTemplate { content } => {
                match self.store.update_template(&content) {
                    Ok(true) => ToolResponse::ok(json!({
                        "sections": self.store.template().sections.len(),
                    })),
                    Ok(false) => ToolResponse::error("document text has no sections"),
                    Err(err) => ToolResponse::error(err.to_string()),
                }
            }

            ToolRequest::ListPresets => match presets::list_presets(&self.store) {
                Ok(names) => ToolResponse::ok(json!({
                    "presets": names.iter().map(|n| n.0.clone()).collect::<Vec<_>>(),
                })),
                Err(err) => ToolResponse::error(err.to_string()),
            },

            ToolRequest::LoadPreset { name } => {
                match presets::load_preset(&mut self.store, &name) {
                    Ok(true) => ToolResponse::ok(json!({ "loaded": name })),
                    Ok(false) => {
                        ToolResponse::error(format!("preset '{name}' not found or unusable"))
                    }
                    Err(err) => ToolResponse::error(err.to_string()),
                }
            }

            ToolRequest::CreatePreset { name } => {
                match presets::create_preset(&self.store, &name) {
                    Ok(()) => ToolResponse::ok(json!({ "created": name })),
                    Err(err) => ToolResponse::error(err.to_string()),
                }
            }

            ToolRequest::ListPlatforms => ToolResponse::ok(json!({
                "platforms": platforms(),
            })),

            ToolRequest::SyncAll { content, dry_run } => {
                match sync_all(&self.store, &self.target_root, content.as_deref(), dry_run) {
                    Ok(results) => match serde_json::to_value(&results) {
                        Ok(value) => ToolResponse::ok(json!({ "results": value })),
                        Err(err) => ToolResponse::error(err.to_string()),
                    },
                    Err(err) => ToolResponse::error(err.to_string()),
                }
            }

            ToolRequest::SyncPlatform { name, dry_run } => {
                match sync_platform(&self.store, &self.target_root, &name, dry_run) {
                    Ok(result) => match serde_json::to_value(&result) {
                        Ok(value) => ToolResponse::ok(value),
                        Err(err) => ToolResponse::error(err.to_string()),
                    },
                    Err(err) => ToolResponse::error(err.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DiskCache;
    use memoria_core::store::DEFAULT_PROFILE;
    use tempfile::TempDir;

    fn make_state() -> (TempDir, TempDir, ServerState) {
        let home = TempDir::new().expect("home");
        let target = TempDir::new().expect("target");
        let mut store = TemplateStore::open_at(home.path(), DEFAULT_PROFILE);
        store.initialize().expect("initialize");
        let state = ServerState::new(store, target.path().to_path_buf());
        (home, target, state)
    }

    #[test]
    fn get_template_returns_serialized_document() {
        let (_home, _target, mut state) = make_state();
        let response = state.handle(ToolRequest::GetTemplate);
        assert!(response.ok);
        let content = response.data.unwrap()["content"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(content.starts_with("# Memory\n"));
        assert!(content.contains("# User Information"));
    }

    #[test]
    fn get_section_is_case_insensitive() {
        let (_home, _target, mut state) = make_state();
        let response = state.handle(ToolRequest::GetSection {
            name: "preferences".to_string(),
        });
        assert!(response.ok);
        assert_eq!(response.data.unwrap()["title"], "Preferences");
    }

    #[test]
    fn get_unknown_section_is_an_error_response() {
        let (_home, _target, mut state) = make_state();
        let response = state.handle(ToolRequest::GetSection {
            name: "Nope".to_string(),
        });
        assert!(!response.ok);
        assert!(response.error.unwrap().contains("Nope"));
    }

    #[test]
    fn update_section_persists_and_reads_back() {
        let (_home, _target, mut state) = make_state();
        let response = state.handle(ToolRequest::UpdateSection {
            name: "Preferences".to_string(),
            content: "## How I like replies\n-~- tone: direct".to_string(),
        });
        assert!(response.ok);

        let response = state.handle(ToolRequest::GetSection {
            name: "Preferences".to_string(),
        });
        let data = response.data.unwrap();
        assert_eq!(data["description"], "How I like replies");
        assert_eq!(data["items"][0]["key"], "tone");
    }

    #[test]
    fn empty_fragment_is_rejected_without_mutation() {
        let (_home, _target, mut state) = make_state();
        let before = state.handle(ToolRequest::GetTemplate).data;

        let response = state.handle(ToolRequest::UpdateSection {
            name: "Preferences".to_string(),
            content: "nothing structured here".to_string(),
        });
        assert!(!response.ok);

        let after = state.handle(ToolRequest::GetTemplate).data;
        assert_eq!(before, after);
    }

    #[test]
    fn preset_lifecycle_over_the_protocol() {
        let (_home, _target, mut state) = make_state();

        let response = state.handle(ToolRequest::ListPresets);
        let names = response.data.unwrap()["presets"].clone();
        assert!(names.as_array().unwrap().iter().any(|n| n == "coding"));

        let response = state.handle(ToolRequest::CreatePreset {
            name: "snapshot".to_string(),
        });
        assert!(response.ok);

        state.handle(ToolRequest::UpdateSection {
            name: "Scratch".to_string(),
            content: "-~- k: v".to_string(),
        });

        let response = state.handle(ToolRequest::LoadPreset {
            name: "snapshot".to_string(),
        });
        assert!(response.ok);

        let response = state.handle(ToolRequest::GetSection {
            name: "Scratch".to_string(),
        });
        assert!(!response.ok, "snapshot predates the Scratch section");
    }

    #[test]
    fn load_missing_preset_is_an_error_response() {
        let (_home, _target, mut state) = make_state();
        let response = state.handle(ToolRequest::LoadPreset {
            name: "ghost".to_string(),
        });
        assert!(!response.ok);
    }

    #[test]
    fn invalid_preset_name_is_an_error_response() {
        let (_home, _target, mut state) = make_state();
        let response = state.handle(ToolRequest::CreatePreset {
            name: "../escape".to_string(),
        });
        assert!(!response.ok);
    }

    #[test]
    fn list_platforms_matches_sync_registry() {
        let (_home, _target, mut state) = make_state();
        let response = state.handle(ToolRequest::ListPlatforms);
        let listed = response.data.unwrap()["platforms"].clone();
        assert_eq!(listed.as_array().unwrap().len(), platforms().len());
    }

    #[test]
    fn sync_all_reports_per_platform_results() {
        let (_home, target, mut state) = make_state();
        let response = state.handle(ToolRequest::SyncAll {
            content: None,
            dry_run: false,
        });
        assert!(response.ok);
        let results = response.data.unwrap()["results"].clone();
        assert_eq!(results.as_array().unwrap().len(), platforms().len());
        assert!(target.path().join("CLAUDE.md").exists());
    }

    #[test]
    fn sync_unknown_platform_reports_failed_result() {
        let (_home, _target, mut state) = make_state();
        let response = state.handle(ToolRequest::SyncPlatform {
            name: "emacs".to_string(),
            dry_run: false,
        });
        // The op itself succeeds; the result payload carries the failure.
        assert!(response.ok);
        let data = response.data.unwrap();
        assert_eq!(data["success"], false);
    }

    #[test]
    fn cached_reads_track_document_mutations() {
        let (_home, target, cache_dir) = (
            TempDir::new().expect("home"),
            TempDir::new().expect("target"),
            TempDir::new().expect("cache"),
        );
        let mut store = TemplateStore::open_at(_home.path(), DEFAULT_PROFILE);
        store.initialize().expect("initialize");
        let mut state = ServerState::new(store, target.path().to_path_buf())
            .with_cache(Box::new(DiskCache::new(cache_dir.path().to_path_buf())));

        let first = state.handle(ToolRequest::GetTemplate);
        let second = state.handle(ToolRequest::GetTemplate);
        assert_eq!(first.data, second.data, "repeat read served identically");

        state.handle(ToolRequest::UpdateSection {
            name: "Preferences".to_string(),
            content: "-~- fresh: yes".to_string(),
        });

        let third = state.handle(ToolRequest::GetTemplate);
        let content = third.data.unwrap()["content"].as_str().unwrap().to_string();
        assert!(content.contains("fresh"), "mutation visible after caching");
    }
}
