//! Speech commands. The page calls the first group on user action and
//! the rest to report what its Web Speech objects are doing.

use crate::controller::AppController;
use crate::stt::browser::WebviewRecognizer;
use crate::stt::{RecognitionBatch, RecognitionState, SpeechInput};
use crate::tts::browser::WebviewSynthesizer;
use crate::tts::{SpeechOutput, SpeechState, Voice};
use std::sync::Arc;
use tauri::{command, State};

// ── User actions ───────────────────────────────────────

/// Speaker button on a result card: plays the text, or stops it if it is
/// the one currently audible.
#[command]
pub async fn speak_text(
    speech: State<'_, SpeechOutput>,
    app: State<'_, AppController>,
    text: String,
) -> Result<(), String> {
    let lang = app.snapshot().language.speech_code();
    speech.speak(&text, lang).await?;
    Ok(())
}

#[command]
pub async fn stop_speaking(speech: State<'_, SpeechOutput>) -> Result<(), String> {
    speech.stop().await;
    Ok(())
}

#[command]
pub async fn get_speech_state(speech: State<'_, SpeechOutput>) -> Result<SpeechState, String> {
    Ok(speech.state().await)
}

#[command]
pub async fn toggle_listening(input: State<'_, SpeechInput>) -> Result<RecognitionState, String> {
    Ok(input.toggle_listening().await)
}

#[command]
pub async fn get_recognition_state(
    input: State<'_, SpeechInput>,
) -> Result<RecognitionState, String> {
    Ok(input.state().await)
}

// ── Host capability reports ────────────────────────────

/// Sent once on page load after probing `speechSynthesis` and
/// `SpeechRecognition`.
#[command]
pub async fn report_speech_capabilities(
    synthesizer: State<'_, Arc<WebviewSynthesizer>>,
    recognizer: State<'_, Arc<WebviewRecognizer>>,
    input: State<'_, SpeechInput>,
    synthesis: bool,
    recognition: bool,
) -> Result<(), String> {
    tracing::info!(
        "[App] Webview speech capabilities: synthesis={}, recognition={}",
        synthesis,
        recognition
    );
    synthesizer.set_supported(synthesis);
    recognizer.set_supported(recognition);
    input.refresh_support().await;
    Ok(())
}

#[command]
pub async fn update_voices(
    synthesizer: State<'_, Arc<WebviewSynthesizer>>,
    voices: Vec<Voice>,
) -> Result<(), String> {
    synthesizer.set_voices(voices);
    Ok(())
}

// ── Synthesis lifecycle ────────────────────────────────

#[command]
pub async fn speech_started(speech: State<'_, SpeechOutput>, id: u64) -> Result<(), String> {
    speech.on_started(id).await;
    Ok(())
}

#[command]
pub async fn speech_ended(speech: State<'_, SpeechOutput>, id: u64) -> Result<(), String> {
    speech.on_ended(id).await;
    Ok(())
}

#[command]
pub async fn speech_failed(
    speech: State<'_, SpeechOutput>,
    id: u64,
    error: String,
) -> Result<(), String> {
    speech.on_failed(id, &error).await;
    Ok(())
}

// ── Recognition lifecycle ──────────────────────────────
// `session` is the id sent with `speech-recognition://start`.

#[command]
pub async fn recognition_started(input: State<'_, SpeechInput>, session: u64) -> Result<(), String> {
    input.on_started(session).await;
    Ok(())
}

#[command]
pub async fn recognition_result(
    input: State<'_, SpeechInput>,
    session: u64,
    batch: RecognitionBatch,
) -> Result<(), String> {
    input.on_result(session, &batch).await;
    Ok(())
}

#[command]
pub async fn recognition_ended(input: State<'_, SpeechInput>, session: u64) -> Result<(), String> {
    input.on_ended(session).await;
    Ok(())
}

#[command]
pub async fn recognition_failed(
    input: State<'_, SpeechInput>,
    session: u64,
    error: String,
) -> Result<(), String> {
    input.on_error(session, &error).await;
    Ok(())
}
