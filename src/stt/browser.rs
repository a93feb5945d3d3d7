use super::interface::{RecognitionEngine, RecognitionError, RecognitionSettings};
use std::sync::atomic::{AtomicBool, Ordering};
use tauri::{AppHandle, Emitter};

pub const START_EVENT: &str = "speech-recognition://start";
pub const STOP_EVENT: &str = "speech-recognition://stop";

/// Browser speech recognition (`SpeechRecognition` / `webkitSpeechRecognition`)
/// driven through Tauri events. The page reports start/result/end/error back
/// through the `recognition_*` commands.
pub struct WebviewRecognizer {
    app: AppHandle,
    supported: AtomicBool,
}

impl WebviewRecognizer {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            // Hidden until the page confirms the API exists
            supported: AtomicBool::new(false),
        }
    }

    pub fn set_supported(&self, supported: bool) {
        self.supported.store(supported, Ordering::Relaxed);
    }
}

impl RecognitionEngine for WebviewRecognizer {
    fn id(&self) -> String {
        "browser".to_string()
    }

    fn is_supported(&self) -> bool {
        self.supported.load(Ordering::Relaxed)
    }

    fn start(&self, settings: &RecognitionSettings) -> Result<(), RecognitionError> {
        self.app
            .emit(START_EVENT, settings)
            .map_err(|e| RecognitionError::Start(e.to_string()))
    }

    fn stop(&self) {
        if let Err(e) = self.app.emit(STOP_EVENT, ()) {
            tracing::warn!("[STT] Failed to deliver stop to webview: {}", e);
        }
    }
}
