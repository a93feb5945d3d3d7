#[cfg(feature = "desktop")]
pub mod commands;
pub mod config;
pub mod controller;
pub mod favorites;
pub mod llm;
pub mod models;
pub mod stt;
pub mod tts;
pub mod utils;

/// Install the global `tracing` subscriber. Filter comes from `RUST_LOG`,
/// defaulting to `info`. Safe to call more than once.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(feature = "desktop")]
mod desktop {
    use crate::controller::{AppController, ControllerConfig};
    use crate::favorites::{FavoritesStore, JsonFileSlot};
    use crate::stt::browser::WebviewRecognizer;
    use crate::stt::{SpeechInput, TranscriptSink};
    use crate::tts::browser::WebviewSynthesizer;
    use crate::tts::SpeechOutput;
    use crate::{commands, config, llm, stt, tts};
    use serde::Serialize;
    use std::sync::Arc;
    use tauri::{AppHandle, Emitter, Manager, RunEvent};
    use tokio::sync::watch;

    pub const APP_STATE_EVENT: &str = "app-state";
    pub const SPEECH_STATE_EVENT: &str = "speech-state";
    pub const RECOGNITION_STATE_EVENT: &str = "recognition-state";

    /// Re-emit every published value of `rx` to the page.
    fn forward<T>(app: AppHandle, event: &'static str, mut rx: watch::Receiver<T>)
    where
        T: Serialize + Clone + Send + Sync + 'static,
    {
        tauri::async_runtime::spawn(async move {
            while rx.changed().await.is_ok() {
                let value = rx.borrow_and_update().clone();
                if let Err(e) = app.emit(event, value) {
                    tracing::warn!("[App] Failed to emit '{}': {}", event, e);
                }
            }
        });
    }

    fn setup(app: &mut tauri::App) -> anyhow::Result<()> {
        let app_data = config::app_data_dir();
        std::fs::create_dir_all(&app_data)?;
        tracing::info!("[App] Data directory: {}", app_data.display());

        // Generation client
        let llm_config = llm::load_config(&app_data.join("llm_config.json"));
        let generator = Arc::new(llm::GeminiClient::from_config(&llm_config));

        // Hall of fame
        let favorites = FavoritesStore::load(Box::new(JsonFileSlot::in_dir(&app_data)));

        // Speech output through the webview's speechSynthesis
        let synthesizer = Arc::new(WebviewSynthesizer::new(app.handle().clone()));
        let speech = SpeechOutput::new(
            synthesizer.clone(),
            tts::load_config(&app_data.join("tts_config.json")),
        );

        let controller = AppController::new(
            generator,
            favorites,
            Some(speech.clone()),
            ControllerConfig::default(),
        );

        // Speech input; finalized dictation is appended to the situation
        let recognizer = Arc::new(WebviewRecognizer::new(app.handle().clone()));
        let sink: TranscriptSink = {
            let controller = controller.clone();
            Arc::new(move |transcript: String| controller.append_transcript(&transcript))
        };
        let input = SpeechInput::new(
            recognizer.clone(),
            stt::load_config(&app_data.join("stt_config.json")),
            controller.snapshot().language.speech_code(),
            sink,
        );

        forward(app.handle().clone(), APP_STATE_EVENT, controller.subscribe());
        forward(app.handle().clone(), SPEECH_STATE_EVENT, speech.subscribe());
        forward(app.handle().clone(), RECOGNITION_STATE_EVENT, input.subscribe());

        app.manage(synthesizer);
        app.manage(recognizer);
        app.manage(speech);
        app.manage(input);
        app.manage(controller);
        Ok(())
    }

    pub fn run() {
        crate::init_tracing();

        let app = tauri::Builder::default()
            .invoke_handler(tauri::generate_handler![
                commands::app::get_app_state,
                commands::app::set_situation,
                commands::app::set_tone,
                commands::app::set_language,
                commands::app::set_view,
                commands::speech::speak_text,
                commands::speech::stop_speaking,
                commands::speech::get_speech_state,
                commands::speech::toggle_listening,
                commands::speech::get_recognition_state,
                commands::speech::report_speech_capabilities,
                commands::speech::update_voices,
                commands::speech::speech_started,
                commands::speech::speech_ended,
                commands::speech::speech_failed,
                commands::speech::recognition_started,
                commands::speech::recognition_result,
                commands::speech::recognition_ended,
                commands::speech::recognition_failed,
                commands::llm::get_llm_config,
                commands::llm::save_llm_config,
            ])
            .setup(|app| setup(app).map_err(Into::into))
            .build(tauri::generate_context!())
            .expect("error while building tauri application");

        app.run(|handle, event| {
            if let RunEvent::ExitRequested { .. } = event {
                if let Some(speech) = handle.try_state::<SpeechOutput>() {
                    let speech = speech.inner().clone();
                    tauri::async_runtime::block_on(speech.shutdown());
                }
            }
        });
    }
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    desktop::run();
}
