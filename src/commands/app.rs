use crate::controller::{AppController, AppSnapshot, View};
use crate::models::{Language, Tone};
use crate::stt::SpeechInput;
use tauri::{command, State};

#[command]
pub async fn get_app_state(state: State<'_, AppController>) -> Result<AppSnapshot, String> {
    Ok(state.snapshot())
}

/// Every keystroke lands here; the controller debounces the auto-submit.
/// `seq` increases per keystroke so reordered calls cannot restore old text.
#[command]
pub async fn set_situation(
    state: State<'_, AppController>,
    situation: String,
    seq: u64,
) -> Result<(), String> {
    state.edit_situation(seq, situation);
    Ok(())
}

#[command]
pub async fn set_tone(state: State<'_, AppController>, tone: Tone) -> Result<(), String> {
    state.set_tone(tone);
    Ok(())
}

/// Language drives both generation output and the recognizer's locale.
#[command]
pub async fn set_language(
    state: State<'_, AppController>,
    input: State<'_, SpeechInput>,
    language: Language,
) -> Result<(), String> {
    state.set_language(language);
    input.set_language(language.speech_code()).await;
    Ok(())
}

#[command]
pub async fn set_view(state: State<'_, AppController>, view: View) -> Result<(), String> {
    state.set_view(view);
    Ok(())
}
