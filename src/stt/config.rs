//! Speech recognition configuration: persisted to `stt_config.json`.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Keep listening across pauses until stopped.
    #[serde(default = "default_true")]
    pub continuous: bool,
    #[serde(default = "default_true")]
    pub interim_results: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            continuous: true,
            interim_results: true,
        }
    }
}

pub fn load_config(path: &Path) -> RecognitionConfig {
    crate::config::load_json_config(path, "STT")
}
