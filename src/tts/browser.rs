use super::interface::{SpeechError, SpeechSynthesizer, Utterance, Voice};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tauri::{AppHandle, Emitter};

pub const SPEAK_EVENT: &str = "speech-synthesis://speak";
pub const CANCEL_EVENT: &str = "speech-synthesis://cancel";

/// Browser speech synthesis. Delegates to the webview's
/// `window.speechSynthesis` through Tauri events.
///
/// The Rust backend cannot call Web APIs directly. The page reports
/// whether the API exists and which voices are installed, plays each
/// `speech-synthesis://speak` payload, and reports lifecycle back through
/// the `speech_started` / `speech_ended` / `speech_failed` commands.
pub struct WebviewSynthesizer {
    app: AppHandle,
    supported: AtomicBool,
    voices: RwLock<Vec<Voice>>,
}

impl WebviewSynthesizer {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            // Assume present until the page says otherwise
            supported: AtomicBool::new(true),
            voices: RwLock::new(Vec::new()),
        }
    }

    pub fn set_supported(&self, supported: bool) {
        self.supported.store(supported, Ordering::Relaxed);
    }

    /// Voices load lazily in most browsers; the page re-sends on `voiceschanged`.
    pub fn set_voices(&self, voices: Vec<Voice>) {
        if voices.is_empty() {
            return;
        }
        tracing::info!("[TTS] Webview reported {} voice(s)", voices.len());
        if let Ok(mut guard) = self.voices.write() {
            *guard = voices;
        }
    }
}

impl SpeechSynthesizer for WebviewSynthesizer {
    fn id(&self) -> String {
        "browser".to_string()
    }

    fn is_supported(&self) -> bool {
        self.supported.load(Ordering::Relaxed)
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.read().map(|v| v.clone()).unwrap_or_default()
    }

    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        self.app
            .emit(SPEAK_EVENT, utterance)
            .map_err(|e| SpeechError::Engine(e.to_string()))
    }

    fn cancel(&self) {
        if let Err(e) = self.app.emit(CANCEL_EVENT, ()) {
            tracing::warn!("[TTS] Failed to deliver cancel to webview: {}", e);
        }
    }
}
