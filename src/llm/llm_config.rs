//! Generation endpoint configuration: persisted to `llm_config.json`.

use crate::config;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Direct API key (takes precedence over env var)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name to read API key from
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature for the generation call.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl GenerationConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        config::resolve_api_key(&self.api_key, &self.api_key_env)
    }
}

fn default_api_key_env() -> Option<String> {
    Some("API_KEY".to_string())
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.9
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

pub fn load_config(path: &Path) -> GenerationConfig {
    config::load_json_config(path, "LLM")
}

pub fn save_config(path: &Path, config: &GenerationConfig) -> Result<(), String> {
    config::save_json_config(path, config, "LLM")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: GenerationConfig = serde_json::from_str(r#"{"model":"gemini-2.0-flash"}"#).unwrap();
        assert_eq!(parsed.model, "gemini-2.0-flash");
        assert_eq!(parsed.base_url, DEFAULT_BASE_URL);
        assert_eq!(parsed.api_key_env.as_deref(), Some("API_KEY"));
        assert!((parsed.temperature - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("llm_config.json");
        let cfg = GenerationConfig {
            api_key: Some("k".to_string()),
            temperature: 0.5,
            ..GenerationConfig::default()
        };
        save_config(&path, &cfg).unwrap();
        assert_eq!(load_config(&path), cfg);
    }
}
