//! Speech output, sole owner of the host synthesis engine.

use super::config::SpeechOutputConfig;
use super::interface::{SpeechError, SpeechState, SpeechSynthesizer, Utterance};
use super::voice::select_voice;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};

/// What a `speak` call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Utterance with this id was handed to the engine.
    Started(u64),
    /// Same text was already audible, so it was stopped instead.
    Stopped,
    /// A newer `speak` or `stop` arrived during the settle delay.
    Superseded,
    /// Host has no synthesis capability.
    Unsupported,
}

#[derive(Default)]
struct Playback {
    /// Bumped by every speak/stop; a pending start only proceeds if it still holds the latest id.
    latest: u64,
    /// Utterance handed to the engine and not yet finished.
    current: Option<(u64, String)>,
    state: SpeechState,
}

#[derive(Clone)]
pub struct SpeechOutput {
    engine: Arc<dyn SpeechSynthesizer>,
    config: Arc<SpeechOutputConfig>,
    playback: Arc<Mutex<Playback>>,
    state_tx: Arc<watch::Sender<SpeechState>>,
}

impl SpeechOutput {
    pub fn new(engine: Arc<dyn SpeechSynthesizer>, config: SpeechOutputConfig) -> Self {
        let (state_tx, _) = watch::channel(SpeechState::default());
        tracing::info!("[TTS] Speech output using engine '{}'", engine.id());
        Self {
            engine,
            config: Arc::new(config),
            playback: Arc::new(Mutex::new(Playback::default())),
            state_tx: Arc::new(state_tx),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.engine.is_supported()
    }

    pub async fn state(&self) -> SpeechState {
        self.playback.lock().await.state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SpeechState> {
        self.state_tx.subscribe()
    }

    fn publish(&self, playback: &mut Playback, state: SpeechState) {
        playback.state = state.clone();
        self.state_tx.send_replace(state);
    }

    /// Cancel whatever the engine holds and go idle. Caller holds the lock.
    fn halt(&self, playback: &mut Playback) {
        if playback.current.is_some() || playback.state.is_speaking {
            self.engine.cancel();
        }
        playback.current = None;
        if playback.state != SpeechState::default() {
            self.publish(playback, SpeechState::default());
        }
    }

    /// Speak `text` in `lang`, or stop it if it is what is audible right now.
    pub async fn speak(&self, text: &str, lang: &str) -> Result<SpeakOutcome, SpeechError> {
        if !self.engine.is_supported() {
            tracing::warn!("[TTS] Speech synthesis not supported");
            return Ok(SpeakOutcome::Unsupported);
        }

        let id = {
            let mut playback = self.playback.lock().await;
            playback.latest += 1;
            if playback.state.is_speaking_text(text) {
                self.halt(&mut playback);
                return Ok(SpeakOutcome::Stopped);
            }
            self.halt(&mut playback);
            playback.latest
        };

        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

        let mut playback = self.playback.lock().await;
        if playback.latest != id {
            return Ok(SpeakOutcome::Superseded);
        }

        let voices = self.engine.voices();
        let voice = select_voice(&voices, lang, &self.config).map(|v| v.name.clone());
        let utterance = Utterance {
            id,
            text: text.to_string(),
            lang: lang.to_string(),
            pitch: self.config.pitch,
            rate: self.config.rate,
            voice,
        };

        match self.engine.speak(&utterance) {
            Ok(()) => {
                playback.current = Some((id, utterance.text));
                Ok(SpeakOutcome::Started(id))
            }
            Err(e) => {
                tracing::error!("[TTS] Failed to start utterance {}: {}", id, e);
                Err(e)
            }
        }
    }

    /// Stop any audible or pending utterance.
    pub async fn stop(&self) {
        let mut playback = self.playback.lock().await;
        playback.latest += 1;
        self.halt(&mut playback);
    }

    /// Page unload / app exit.
    pub async fn shutdown(&self) {
        tracing::info!("[TTS] Cancelling speech on shutdown");
        self.stop().await;
    }

    // ── Engine lifecycle notifications ──────────────────

    pub async fn on_started(&self, id: u64) {
        let mut playback = self.playback.lock().await;
        let Some(text) = playback
            .current
            .as_ref()
            .filter(|(current, _)| *current == id)
            .map(|(_, text)| text.clone())
        else {
            tracing::debug!("[TTS] Ignoring start of stale utterance {}", id);
            return;
        };
        self.publish(
            &mut playback,
            SpeechState {
                is_speaking: true,
                spoken_text: Some(text),
            },
        );
    }

    pub async fn on_ended(&self, id: u64) {
        self.finish(id, None).await;
    }

    pub async fn on_failed(&self, id: u64, error: &str) {
        self.finish(id, Some(error)).await;
    }

    async fn finish(&self, id: u64, error: Option<&str>) {
        let mut playback = self.playback.lock().await;
        if !matches!(playback.current, Some((current, _)) if current == id) {
            return;
        }
        if let Some(error) = error {
            tracing::error!("[TTS] Speech synthesis error: {}", error);
        }
        playback.current = None;
        self.publish(&mut playback, SpeechState::default());
    }
}
