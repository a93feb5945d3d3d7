use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error Types ────────────────────────────────────────

#[derive(Debug, Clone, Error)]
pub enum SpeechError {
    #[error("Speech synthesis failed: {0}")]
    Engine(String),
}

// For Tauri command return compatibility
impl From<SpeechError> for String {
    fn from(e: SpeechError) -> String {
        e.to_string()
    }
}

// ── Voices & Utterances ────────────────────────────────

/// One installed voice as reported by the host engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub name: String,
    /// BCP-47 tag, e.g. "ko-KR"
    pub lang: String,
    /// Rendered on-device rather than by a network service
    #[serde(default)]
    pub local_service: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utterance {
    /// Echoed back by lifecycle notifications.
    pub id: u64,
    pub text: String,
    pub lang: String,
    pub pitch: f32,
    pub rate: f32,
    /// Voice name; `None` leaves the choice to the engine.
    pub voice: Option<String>,
}

/// What the presentation layer needs to highlight the audible card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechState {
    pub is_speaking: bool,
    pub spoken_text: Option<String>,
}

impl SpeechState {
    pub fn is_speaking_text(&self, text: &str) -> bool {
        self.is_speaking && self.spoken_text.as_deref() == Some(text)
    }
}

// ── Engine Trait ───────────────────────────────────────

/// The host's single, globally shared synthesis engine.
///
/// Only one utterance may be active at a time; callers must `cancel`
/// before handing over a new one. Lifecycle (start/end/error) is reported
/// back asynchronously through `SpeechOutput`.
pub trait SpeechSynthesizer: Send + Sync {
    fn id(&self) -> String;

    fn is_supported(&self) -> bool;

    /// Voices currently installed. May be empty until the host has loaded them.
    fn voices(&self) -> Vec<Voice>;

    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;

    fn cancel(&self);
}
