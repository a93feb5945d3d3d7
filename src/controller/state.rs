use crate::models::{
    is_submittable, Language, RefusalCandidate, ScoreBand, Tone, MIN_SITUATION_CHARS,
};
use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum View {
    #[default]
    Generator,
    HallOfFame,
}

/// Timing and input thresholds for auto-submission.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Quiet period after the last edit before an auto-submit fires.
    pub debounce: Duration,
    pub min_situation_chars: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1500),
            min_situation_chars: MIN_SITUATION_CHARS,
        }
    }
}

/// Everything the page renders. Published whole on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub view: View,
    pub language: Language,
    pub tone: Tone,
    pub situation: String,
    #[serde(serialize_with = "serialize_cards")]
    pub results: Vec<RefusalCandidate>,
    pub is_loading: bool,
    pub error: Option<String>,
    #[serde(serialize_with = "serialize_cards")]
    pub favorites: Vec<RefusalCandidate>,
    /// Drives the "minimum characters" hint under the input.
    pub can_submit: bool,
}

/// A candidate as the page renders it, colour band resolved.
#[derive(Serialize)]
struct Card<'a> {
    #[serde(flatten)]
    candidate: &'a RefusalCandidate,
    band: ScoreBand,
}

#[allow(clippy::ptr_arg)]
fn serialize_cards<S: Serializer>(
    candidates: &Vec<RefusalCandidate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(candidates.iter().map(|candidate| Card {
        candidate,
        band: candidate.score_band(),
    }))
}

impl AppSnapshot {
    pub(crate) fn initial(favorites: Vec<RefusalCandidate>) -> Self {
        Self {
            view: View::default(),
            language: Language::default(),
            tone: Tone::default(),
            situation: String::new(),
            results: Vec::new(),
            is_loading: false,
            error: None,
            favorites,
            can_submit: false,
        }
    }

    pub(crate) fn refresh_derived(&mut self, config: &ControllerConfig) {
        self.can_submit = is_submittable(&self.situation, config.min_situation_chars);
    }
}
