//! Application controller: owns the form state, drives generation and
//! feeds the hall of fame and speech output with the results.

mod state;

pub use state::{AppSnapshot, ControllerConfig, View};

use crate::favorites::FavoritesStore;
use crate::llm::RefusalGenerator;
use crate::models::{GenerationRequest, GenerationResult, Language, Tone};
use crate::tts::SpeechOutput;
use crate::utils::Debouncer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Results were published; `added_favorites` new hall-of-fame entries.
    Completed { added_favorites: usize },
    /// The error message was published; previous results stay on screen.
    Failed,
    /// Another generation was already in flight, or the input was too short.
    Ignored,
}

/// Clears the in-flight flag however the generation ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Inner {
    config: ControllerConfig,
    generator: RwLock<Arc<dyn RefusalGenerator>>,
    favorites: Mutex<FavoritesStore>,
    speech: Option<SpeechOutput>,
    in_flight: AtomicBool,
    /// Highest sequence number applied by `edit_situation`.
    last_edit: std::sync::Mutex<u64>,
    debouncer: Debouncer,
    state_tx: watch::Sender<AppSnapshot>,
}

#[derive(Clone)]
pub struct AppController {
    inner: Arc<Inner>,
}

impl AppController {
    pub fn new(
        generator: Arc<dyn RefusalGenerator>,
        favorites: FavoritesStore,
        speech: Option<SpeechOutput>,
        config: ControllerConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(AppSnapshot::initial(favorites.entries().to_vec()));
        tracing::info!(
            "[App] Controller ready (generator '{}', {} favorites)",
            generator.id(),
            favorites.len()
        );
        Self {
            inner: Arc::new(Inner {
                debouncer: Debouncer::new(config.debounce),
                config,
                generator: RwLock::new(generator),
                favorites: Mutex::new(favorites),
                speech,
                in_flight: AtomicBool::new(false),
                last_edit: std::sync::Mutex::new(0),
                state_tx,
            }),
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        self.inner.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.inner.state_tx.subscribe()
    }

    pub fn is_generating(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Swap the generation client after its settings changed. A generation
    /// already in flight finishes on the previous client.
    pub async fn replace_generator(&self, generator: Arc<dyn RefusalGenerator>) {
        tracing::info!("[App] Generator replaced with '{}'", generator.id());
        *self.inner.generator.write().await = generator;
    }

    fn update(&self, f: impl FnOnce(&mut AppSnapshot)) {
        let config = &self.inner.config;
        self.inner.state_tx.send_modify(|s| {
            f(s);
            s.refresh_derived(config);
        });
    }

    // ── Generation ──────────────────────────────────────

    /// Run one generation. At most one is in flight; overlapping calls
    /// return `Ignored` without reaching the generator.
    pub async fn generate(&self, request: GenerationRequest) -> GenerateOutcome {
        if self
            .inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("[App] Generation already in flight, request ignored");
            return GenerateOutcome::Ignored;
        }
        let _guard = InFlightGuard(&self.inner.in_flight);

        self.update(|s| {
            s.is_loading = true;
            s.error = None;
        });
        let generator = self.inner.generator.read().await.clone();
        tracing::info!(
            "[LLM] Generating refusals ({}, {}) via '{}'",
            request.tone.english_name(),
            request.language.speech_code(),
            generator.id()
        );

        match generator.generate(&request).await {
            Ok(result) => {
                let added_favorites = self.accept(result, request.language).await;
                GenerateOutcome::Completed { added_favorites }
            }
            Err(e) => {
                tracing::error!("[LLM] Generation failed: {}", e);
                let message = e.user_message();
                self.update(|s| {
                    s.error = Some(message);
                    s.is_loading = false;
                });
                GenerateOutcome::Failed
            }
        }
    }

    async fn accept(&self, result: GenerationResult, language: Language) -> usize {
        let (added, favorites) = {
            let mut store = self.inner.favorites.lock().await;
            let added = store.merge_high_scorers(&result.refusals);
            (added, store.entries().to_vec())
        };

        if let Some(first) = result.refusals.first() {
            self.schedule_playback(first.text.clone(), language);
        }

        self.update(|s| {
            s.results = result.refusals;
            s.favorites = favorites;
            s.is_loading = false;
        });
        added
    }

    fn schedule_playback(&self, text: String, language: Language) {
        let Some(speech) = self.inner.speech.clone() else {
            return;
        };
        tokio::spawn(async move {
            if let Err(e) = speech.speak(&text, language.speech_code()).await {
                tracing::warn!("[TTS] Auto-play of first result failed: {}", e);
            }
        });
    }

    /// Submit whatever the form currently holds, if it is long enough.
    pub async fn submit_current(&self) -> GenerateOutcome {
        let snapshot = self.snapshot();
        if !snapshot.can_submit {
            return GenerateOutcome::Ignored;
        }
        let request = GenerationRequest::new(
            snapshot.situation.trim(),
            snapshot.tone,
            snapshot.language,
        );
        self.generate(request).await
    }

    // ── Form edits ──────────────────────────────────────

    /// Drop any pending auto-submit and, if the input is long enough,
    /// schedule a fresh one that reads the form when it fires.
    fn reschedule(&self) {
        self.inner.debouncer.cancel();
        if !self.snapshot().can_submit {
            return;
        }
        let this = self.clone();
        self.inner.debouncer.schedule(async move {
            this.submit_current().await;
        });
    }

    pub fn set_situation(&self, situation: impl Into<String>) {
        if self.apply_situation(situation.into()) {
            self.reschedule();
        }
    }

    /// Keystroke from the page. Edits may arrive out of order, so one whose
    /// `seq` is not above the last applied edit is dropped. Returns whether
    /// it was applied.
    pub fn edit_situation(&self, seq: u64, situation: String) -> bool {
        let changed = {
            let mut last = self.inner.last_edit.lock().unwrap_or_else(|e| e.into_inner());
            if seq <= *last {
                tracing::debug!("[App] Dropping stale edit {} (last {})", seq, *last);
                return false;
            }
            *last = seq;
            self.apply_situation(situation)
        };
        if changed {
            self.reschedule();
        }
        true
    }

    fn apply_situation(&self, situation: String) -> bool {
        if self.inner.state_tx.borrow().situation == situation {
            return false;
        }
        self.update(|s| s.situation = situation);
        true
    }

    pub fn set_tone(&self, tone: Tone) {
        if self.inner.state_tx.borrow().tone == tone {
            return;
        }
        self.update(|s| s.tone = tone);
        self.reschedule();
    }

    pub fn set_language(&self, language: Language) {
        if self.inner.state_tx.borrow().language == language {
            return;
        }
        self.update(|s| s.language = language);
        self.reschedule();
    }

    pub fn set_view(&self, view: View) {
        self.update(|s| s.view = view);
    }

    /// Append dictated text to the situation with a separating space.
    pub fn append_transcript(&self, transcript: &str) {
        let combined = {
            let current = self.inner.state_tx.borrow();
            format!("{} {}", current.situation, transcript)
                .trim()
                .to_string()
        };
        self.set_situation(combined);
    }
}
