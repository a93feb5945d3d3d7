//! Shared config utilities for loading/saving JSON config files
//! and resolving API keys from fields or environment variables.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
#[cfg(feature = "desktop")]
use std::path::PathBuf;

/// Identifier used for the per-user data directory.
#[cfg(feature = "desktop")]
pub const APP_IDENTIFIER: &str = "com.refusalmaker.app";

/// Per-user data directory holding configs and the favorites slot.
/// Falls back to the working directory when the platform has none.
#[cfg(feature = "desktop")]
pub fn app_data_dir() -> PathBuf {
    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_IDENTIFIER)
}

/// Generic load for any Serde config type with a `Default` implementation.
/// Falls back to `T::default()` if the file is missing or unparsable.
pub fn load_json_config<T: DeserializeOwned + Default>(path: &Path, label: &str) -> T {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<T>(&content) {
            Ok(config) => {
                tracing::info!("[{}] Loaded config from {}", label, path.display());
                config
            }
            Err(e) => {
                tracing::warn!(
                    "[{}] Failed to parse config {}: {}, using defaults",
                    label,
                    path.display(),
                    e
                );
                T::default()
            }
        },
        Err(_) => {
            tracing::info!(
                "[{}] No config file at {}, using defaults",
                label,
                path.display()
            );
            T::default()
        }
    }
}

/// Generic save for any Serde config type.
pub fn save_json_config<T: Serialize>(path: &Path, config: &T, label: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;
    tracing::info!("[{}] Saved config to {}", label, path.display());
    Ok(())
}

/// Resolve an API key: check the direct `api_key` field first,
/// then fall back to reading the environment variable named in `api_key_env`.
pub fn resolve_api_key(api_key: &Option<String>, api_key_env: &Option<String>) -> Option<String> {
    if let Some(ref key) = api_key {
        if !key.trim().is_empty() {
            return Some(key.clone());
        }
    }
    if let Some(ref env_var) = api_key_env {
        if let Ok(key) = std::env::var(env_var) {
            if !key.trim().is_empty() {
                return Some(key);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(default)]
        name: String,
        #[serde(default)]
        level: u32,
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let loaded: Sample = load_json_config(&tmp.path().join("absent.json"), "Test");
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let loaded: Sample = load_json_config(&path, "Test");
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn save_creates_parent_dirs_and_round_trips() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("dir").join("sample.json");
        let sample = Sample {
            name: "kokoro".to_string(),
            level: 3,
        };
        save_json_config(&path, &sample, "Test").unwrap();
        let loaded: Sample = load_json_config(&path, "Test");
        assert_eq!(loaded, sample);
    }

    #[test]
    fn direct_key_wins_over_env() {
        std::env::set_var("REFUSAL_MAKER_TEST_KEY_A", "from-env");
        let key = resolve_api_key(
            &Some("direct".to_string()),
            &Some("REFUSAL_MAKER_TEST_KEY_A".to_string()),
        );
        assert_eq!(key.as_deref(), Some("direct"));
    }

    #[test]
    fn blank_direct_key_falls_back_to_env() {
        std::env::set_var("REFUSAL_MAKER_TEST_KEY_B", "from-env");
        let key = resolve_api_key(
            &Some("   ".to_string()),
            &Some("REFUSAL_MAKER_TEST_KEY_B".to_string()),
        );
        assert_eq!(key.as_deref(), Some("from-env"));
    }

    #[test]
    fn no_key_anywhere_is_none() {
        let key = resolve_api_key(&None, &Some("REFUSAL_MAKER_TEST_KEY_UNSET".to_string()));
        assert!(key.is_none());
    }
}
