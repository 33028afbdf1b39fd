//! Install-wide consumer defaults (`<home>/.memoria/config.yaml`).
//!
//! The core never reads this file on its own; the CLI and server load it at
//! start to pick a profile, a sync target root, and an optional cache
//! directory, then pass the values in explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, StoreError};
use crate::store::{self, write_text_atomic};

/// Consumer defaults. Missing file and missing fields both fall back to
/// defaults, so upgrades never break an existing install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Profile whose document the consumers operate on.
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Directory platform destination files are written under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_root: Option<PathBuf>,

    /// When set, the server substitutes a disk-backed response cache for the
    /// no-op default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

fn default_profile() -> String {
    store::DEFAULT_PROFILE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            sync_root: None,
            cache_dir: None,
        }
    }
}

/// `<home>/.memoria/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    store::memoria_dir_at(home).join("config.yaml")
}

/// Load the config, defaulting when the file does not exist.
pub fn load_at(home: &Path) -> Result<Config, StoreError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Config, StoreError> {
    load_at(&crate::store::home()?)
}

/// Atomically save the config.
pub fn save_at(home: &Path, config: &Config) -> Result<(), StoreError> {
    let yaml = serde_yaml::to_string(config)?;
    write_text_atomic(&config_path_at(home), &yaml)
}

/// `save_at` convenience wrapper.
pub fn save(config: &Config) -> Result<(), StoreError> {
    save_at(&crate::store::home()?, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let home = TempDir::new().unwrap();
        let config = load_at(home.path()).expect("load");
        assert_eq!(config, Config::default());
        assert_eq!(config.profile, "default");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let home = TempDir::new().unwrap();
        let config = Config {
            profile: "work".to_string(),
            sync_root: Some(PathBuf::from("/code/my-app")),
            cache_dir: None,
        };
        save_at(home.path(), &config).expect("save");
        let loaded = load_at(home.path()).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let home = TempDir::new().unwrap();
        let path = config_path_at(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "sync_root: /tmp/target\n").unwrap();

        let config = load_at(home.path()).expect("load");
        assert_eq!(config.profile, "default");
        assert_eq!(config.sync_root, Some(PathBuf::from("/tmp/target")));
    }
}
