//! Read-op response cache.
//!
//! Keys include a digest of the current document, so a cached entry can never
//! outlive the state it was computed from; mutating ops additionally clear
//! the cache to keep the backing directory bounded.

use std::path::PathBuf;

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Cache for read-only responses. Failures inside an implementation degrade
/// to misses; the cache is never allowed to fail a request.
pub trait ResponseCache: Send {
    fn get(&self, key: &str) -> Option<Value>;
    fn put(&mut self, key: &str, value: &Value);
    fn clear(&mut self);
}

/// Default cache: remembers nothing.
#[derive(Debug, Default)]
pub struct NoopCache;

impl ResponseCache for NoopCache {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn put(&mut self, _key: &str, _value: &Value) {}

    fn clear(&mut self) {}
}

/// Disk-backed cache: one JSON file per key under a configured directory.
/// Substituted for [`NoopCache`] when the config sets `cache_dir`.
#[derive(Debug)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let mut h = Sha256::new();
        h.update(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(h.finalize())))
    }
}

impl ResponseCache for DiskCache {
    fn get(&self, key: &str) -> Option<Value> {
        let text = std::fs::read_to_string(self.entry_path(key)).ok()?;
        serde_json::from_str(&text).ok()
    }

    fn put(&mut self, key: &str, value: &Value) {
        if std::fs::create_dir_all(&self.dir).is_err() {
            return;
        }
        let Ok(text) = serde_json::to_string(value) else {
            return;
        };
        if let Err(err) = std::fs::write(self.entry_path(key), text) {
            tracing::debug!(error = %err, "cache write failed, skipping entry");
        }
    }

    fn clear(&mut self) {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                let _ = std::fs::remove_file(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn noop_cache_never_hits() {
        let mut cache = NoopCache;
        cache.put("k", &json!({"v": 1}));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn disk_cache_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut cache = DiskCache::new(dir.path().to_path_buf());

        assert!(cache.get("key-1").is_none());
        cache.put("key-1", &json!({"content": "hello"}));
        assert_eq!(cache.get("key-1"), Some(json!({"content": "hello"})));
    }

    #[test]
    fn disk_cache_clear_removes_entries() {
        let dir = TempDir::new().unwrap();
        let mut cache = DiskCache::new(dir.path().to_path_buf());
        cache.put("a", &json!(1));
        cache.put("b", &json!(2));

        cache.clear();
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn distinct_keys_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let mut cache = DiskCache::new(dir.path().to_path_buf());
        cache.put("a", &json!("first"));
        cache.put("b", &json!("second"));
        assert_eq!(cache.get("a"), Some(json!("first")));
        assert_eq!(cache.get("b"), Some(json!("second")));
    }

    #[test]
    fn missing_dir_degrades_to_miss() {
        let cache = DiskCache::new(PathBuf::from("/nonexistent/memoria-cache"));
        assert!(cache.get("anything").is_none());
    }
}
