//! Speech input: manual start/stop dictation on top of the host recognizer.

use super::config::RecognitionConfig;
use super::interface::{RecognitionBatch, RecognitionEngine, RecognitionSettings, RecognitionState};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Receives each finalized transcript; the caller decides how to accumulate it.
pub type TranscriptSink = Arc<dyn Fn(String) + Send + Sync>;

struct Session {
    /// Id of the most recently started session; events for any other are stale.
    id: u64,
    listening: bool,
    /// Set by a user stop so the engine's trailing `end` is not treated as unexpected.
    manual_stop: bool,
    lang: String,
}

#[derive(Clone)]
pub struct SpeechInput {
    engine: Arc<dyn RecognitionEngine>,
    config: Arc<RecognitionConfig>,
    session: Arc<Mutex<Session>>,
    sink: TranscriptSink,
    state_tx: Arc<watch::Sender<RecognitionState>>,
}

impl SpeechInput {
    pub fn new(
        engine: Arc<dyn RecognitionEngine>,
        config: RecognitionConfig,
        lang: &str,
        sink: TranscriptSink,
    ) -> Self {
        let supported = engine.is_supported();
        if !supported {
            tracing::warn!("[STT] Speech recognition is not supported on this host");
        }
        let (state_tx, _) = watch::channel(RecognitionState {
            supported,
            listening: false,
        });
        Self {
            engine,
            config: Arc::new(config),
            session: Arc::new(Mutex::new(Session {
                id: 0,
                listening: false,
                manual_stop: false,
                lang: lang.to_string(),
            })),
            sink,
            state_tx: Arc::new(state_tx),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.engine.is_supported()
    }

    pub async fn state(&self) -> RecognitionState {
        RecognitionState {
            supported: self.is_supported(),
            listening: self.session.lock().await.listening,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<RecognitionState> {
        self.state_tx.subscribe()
    }

    fn publish(&self, session: &mut Session, listening: bool) {
        session.listening = listening;
        self.state_tx.send_replace(RecognitionState {
            supported: self.is_supported(),
            listening,
        });
    }

    /// Re-publish after the host reports (or withdraws) the capability.
    pub async fn refresh_support(&self) {
        let mut session = self.session.lock().await;
        let listening = session.listening && self.is_supported();
        self.publish(&mut session, listening);
    }

    /// Microphone button. Start when idle, stop when listening.
    pub async fn toggle_listening(&self) -> RecognitionState {
        if !self.is_supported() {
            return self.state().await;
        }

        {
            let mut session = self.session.lock().await;
            if session.listening {
                session.manual_stop = true;
                self.engine.stop();
                self.publish(&mut session, false);
            } else {
                session.manual_stop = false;
                session.id += 1;
                let settings = RecognitionSettings {
                    session: session.id,
                    continuous: self.config.continuous,
                    interim_results: self.config.interim_results,
                    lang: session.lang.clone(),
                };
                if let Err(e) = self.engine.start(&settings) {
                    tracing::error!("[STT] {}", e);
                }
            }
        }
        self.state().await
    }

    /// Follow the selected language. An active session is stopped, as the
    /// recognizer only takes its language at start.
    pub async fn set_language(&self, lang: &str) {
        let mut session = self.session.lock().await;
        if session.lang == lang {
            return;
        }
        if session.listening {
            session.manual_stop = true;
            self.engine.stop();
            self.publish(&mut session, false);
        }
        session.lang = lang.to_string();
    }

    // ── Engine lifecycle notifications ──────────────────
    // Each carries the session id from `RecognitionSettings`. A recognizer
    // from an earlier session may still report after a new one started.

    pub async fn on_started(&self, session_id: u64) {
        let mut session = self.session.lock().await;
        if session.id != session_id || session.manual_stop {
            // Late start notification for a session already stopped or replaced
            return;
        }
        self.publish(&mut session, true);
    }

    /// Forward newly finalized text. Interim results never change state.
    pub async fn on_result(&self, session_id: u64, batch: &RecognitionBatch) {
        if self.session.lock().await.id != session_id {
            tracing::debug!("[STT] Ignoring result of stale session {}", session_id);
            return;
        }
        let transcript = batch.final_transcript();
        if !transcript.is_empty() {
            (self.sink)(transcript);
        }
    }

    pub async fn on_ended(&self, session_id: u64) {
        let mut session = self.session.lock().await;
        if session.id != session_id {
            tracing::debug!("[STT] Ignoring end of stale session {}", session_id);
            return;
        }
        if !session.manual_stop && session.listening {
            tracing::info!("[STT] Recognition ended unexpectedly");
            self.publish(&mut session, false);
        }
    }

    pub async fn on_error(&self, session_id: u64, error: &str) {
        tracing::error!("[STT] Speech recognition error: {}", error);
        let mut session = self.session.lock().await;
        if session.id == session_id && session.listening {
            self.publish(&mut session, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::interface::{RecognitionError, RecognitionSegment};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockRecognizer {
        unsupported: bool,
        fail_start: AtomicBool,
        starts: std::sync::Mutex<Vec<RecognitionSettings>>,
        stops: AtomicUsize,
    }

    impl RecognitionEngine for MockRecognizer {
        fn id(&self) -> String {
            "mock".to_string()
        }

        fn is_supported(&self) -> bool {
            !self.unsupported
        }

        fn start(&self, settings: &RecognitionSettings) -> Result<(), RecognitionError> {
            if self.fail_start.load(Ordering::SeqCst) {
                return Err(RecognitionError::Start("InvalidStateError".to_string()));
            }
            self.starts.lock().unwrap().push(settings.clone());
            Ok(())
        }

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn input(engine: MockRecognizer) -> (SpeechInput, Arc<MockRecognizer>, Arc<std::sync::Mutex<Vec<String>>>) {
        let engine = Arc::new(engine);
        let received = Arc::new(std::sync::Mutex::new(Vec::<String>::new()));
        let sink: TranscriptSink = {
            let received = received.clone();
            Arc::new(move |t: String| received.lock().unwrap().push(t))
        };
        let svc = SpeechInput::new(engine.clone(), RecognitionConfig::default(), "ko-KR", sink);
        (svc, engine, received)
    }

    fn batch(items: &[(&str, bool)]) -> RecognitionBatch {
        RecognitionBatch {
            result_index: 0,
            results: items
                .iter()
                .map(|(t, f)| RecognitionSegment {
                    transcript: t.to_string(),
                    is_final: *f,
                })
                .collect(),
        }
    }

    /// Id the engine was given for its latest start.
    fn session(engine: &MockRecognizer) -> u64 {
        engine.starts.lock().unwrap().last().unwrap().session
    }

    /// Toggle on and have the engine confirm; returns the session id.
    async fn listen(svc: &SpeechInput, engine: &MockRecognizer) -> u64 {
        svc.toggle_listening().await;
        let id = session(engine);
        svc.on_started(id).await;
        id
    }

    #[tokio::test]
    async fn toggle_starts_with_continuous_interim_settings() {
        let (svc, engine, _) = input(MockRecognizer::default());
        svc.toggle_listening().await;
        let starts = engine.starts.lock().unwrap().clone();
        assert_eq!(
            starts,
            vec![RecognitionSettings {
                session: 1,
                continuous: true,
                interim_results: true,
                lang: "ko-KR".to_string(),
            }]
        );
        // Listening only once the engine confirms
        assert!(!svc.state().await.listening);
        svc.on_started(1).await;
        assert!(svc.state().await.listening);
    }

    #[tokio::test]
    async fn manual_stop_goes_idle_and_ignores_trailing_end() {
        let (svc, engine, _) = input(MockRecognizer::default());
        let mut rx = svc.subscribe();
        let id = listen(&svc, &engine).await;
        assert!(rx.borrow_and_update().listening);

        let state = svc.toggle_listening().await;
        assert!(!state.listening);
        assert_eq!(engine.stops.load(Ordering::SeqCst), 1);
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        svc.on_ended(id).await;
        assert!(!rx.has_changed().unwrap(), "no extra transition");
    }

    #[tokio::test]
    async fn unexpected_end_goes_idle() {
        let (svc, engine, _) = input(MockRecognizer::default());
        let id = listen(&svc, &engine).await;
        svc.on_ended(id).await;
        assert!(!svc.state().await.listening);
    }

    #[tokio::test]
    async fn engine_error_goes_idle() {
        let (svc, engine, _) = input(MockRecognizer::default());
        let id = listen(&svc, &engine).await;
        svc.on_error(id, "network").await;
        assert!(!svc.state().await.listening);
    }

    #[tokio::test]
    async fn start_failure_stays_idle() {
        let (svc, engine, _) = input(MockRecognizer::default());
        engine.fail_start.store(true, Ordering::SeqCst);
        let state = svc.toggle_listening().await;
        assert!(!state.listening);
        assert!(state.supported);
    }

    #[tokio::test]
    async fn only_final_text_reaches_sink_and_state_holds() {
        let (svc, engine, received) = input(MockRecognizer::default());
        let id = listen(&svc, &engine).await;

        svc.on_result(id, &batch(&[("주말", false)])).await;
        svc.on_result(id, &batch(&[(" 근무는 ", true), ("어렵", false)])).await;

        assert_eq!(*received.lock().unwrap(), vec!["근무는".to_string()]);
        assert!(svc.state().await.listening);
    }

    #[tokio::test]
    async fn final_text_after_manual_stop_still_arrives() {
        let (svc, engine, received) = input(MockRecognizer::default());
        let id = listen(&svc, &engine).await;
        svc.toggle_listening().await;

        svc.on_result(id, &batch(&[("마지막 문장", true)])).await;
        assert_eq!(*received.lock().unwrap(), vec!["마지막 문장".to_string()]);
    }

    #[tokio::test]
    async fn late_start_after_manual_stop_is_ignored() {
        let (svc, engine, _) = input(MockRecognizer::default());
        let id = listen(&svc, &engine).await;
        svc.toggle_listening().await;

        svc.on_started(id).await;
        assert!(!svc.state().await.listening);
    }

    #[tokio::test]
    async fn previous_session_events_do_not_touch_new_one() {
        let (svc, engine, received) = input(MockRecognizer::default());
        let old = listen(&svc, &engine).await;
        svc.toggle_listening().await;
        let new = listen(&svc, &engine).await;
        assert_ne!(old, new);

        // The first recognizer finishes tearing down after the second started
        svc.on_result(old, &batch(&[("old words", true)])).await;
        svc.on_ended(old).await;
        svc.on_error(old, "aborted").await;

        assert!(svc.state().await.listening);
        assert!(received.lock().unwrap().is_empty());

        svc.on_ended(new).await;
        assert!(!svc.state().await.listening);
    }

    #[tokio::test]
    async fn language_change_stops_active_session() {
        let (svc, engine, _) = input(MockRecognizer::default());
        listen(&svc, &engine).await;

        svc.set_language("ja-JP").await;
        assert!(!svc.state().await.listening);
        assert_eq!(engine.stops.load(Ordering::SeqCst), 1);

        svc.toggle_listening().await;
        assert_eq!(engine.starts.lock().unwrap().last().unwrap().lang, "ja-JP");
    }

    #[tokio::test]
    async fn unsupported_toggle_is_a_no_op() {
        let (svc, engine, _) = input(MockRecognizer {
            unsupported: true,
            ..Default::default()
        });
        let state = svc.toggle_listening().await;
        assert_eq!(state, RecognitionState::default());
        assert!(engine.starts.lock().unwrap().is_empty());
    }
}
