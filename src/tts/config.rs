//! Speech output configuration: persisted to `tts_config.json`.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechOutputConfig {
    /// Pause between cancelling one utterance and starting the next.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_one")]
    pub pitch: f32,
    #[serde(default = "default_one")]
    pub rate: f32,
    /// Voices picked first whenever one matches the requested language.
    #[serde(default = "default_preferred_voices")]
    pub preferred_voices: Vec<String>,
    /// Vendors whose on-device voices beat arbitrary matches.
    #[serde(default = "default_native_vendors")]
    pub native_vendors: Vec<String>,
}

fn default_settle_delay_ms() -> u64 {
    100
}

fn default_one() -> f32 {
    1.0
}

fn default_preferred_voices() -> Vec<String> {
    vec!["Yuna".to_string(), "Google 한국의".to_string()]
}

fn default_native_vendors() -> Vec<String> {
    vec![
        "Google".to_string(),
        "Apple".to_string(),
        "Microsoft".to_string(),
    ]
}

impl Default for SpeechOutputConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            pitch: default_one(),
            rate: default_one(),
            preferred_voices: default_preferred_voices(),
            native_vendors: default_native_vendors(),
        }
    }
}

/// Load config from a JSON file. Falls back to defaults if file is missing or invalid.
pub fn load_config(path: &Path) -> SpeechOutputConfig {
    crate::config::load_json_config(path, "TTS")
}
