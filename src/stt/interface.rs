//! Speech recognition engine contract & core types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Core Data Structures ────────────────────────────────

/// How the host recognizer is configured for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionSettings {
    /// Echoed back by every lifecycle notification of this session.
    pub session: u64,
    pub continuous: bool,
    pub interim_results: bool,
    /// BCP-47 tag, e.g. "ko-KR"
    pub lang: String,
}

/// One recognized item; interim items are revised until `is_final`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionSegment {
    pub transcript: String,
    pub is_final: bool,
}

/// A result event. Items before `result_index` were already delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionBatch {
    #[serde(default)]
    pub result_index: usize,
    pub results: Vec<RecognitionSegment>,
}

impl RecognitionBatch {
    /// Concatenated final transcripts from `result_index` on, trimmed.
    pub fn final_transcript(&self) -> String {
        self.results
            .iter()
            .skip(self.result_index)
            .filter(|s| s.is_final)
            .map(|s| s.transcript.as_str())
            .collect::<String>()
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionState {
    /// When false the microphone control is not offered at all.
    pub supported: bool,
    pub listening: bool,
}

// ── Error Handling ─────────────────────────────────────

#[derive(Debug, Clone, Error)]
pub enum RecognitionError {
    #[error("Could not start speech recognition: {0}")]
    Start(String),
}

// For Tauri command return compatibility
impl From<RecognitionError> for String {
    fn from(e: RecognitionError) -> String {
        e.to_string()
    }
}

// ── Engine Trait ───────────────────────────────────────

/// The host's speech recognizer. Session lifecycle and results come back
/// asynchronously through `SpeechInput`.
pub trait RecognitionEngine: Send + Sync {
    fn id(&self) -> String;

    fn is_supported(&self) -> bool;

    fn start(&self, settings: &RecognitionSettings) -> Result<(), RecognitionError>;

    fn stop(&self);
}
