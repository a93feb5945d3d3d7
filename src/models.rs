//! Core domain types shared by the generation client, the favorites store
//! and the controller.

use serde::{Deserialize, Serialize};

/// Candidates scoring at or above this are saved to the hall of fame.
pub const HIGH_SCORE_THRESHOLD: u8 = 90;

/// A situation must be longer than this (trimmed, in characters) to be submitted.
pub const MIN_SITUATION_CHARS: usize = 5;

/// Number of candidates one generation must return, one per tone.
pub const CANDIDATES_PER_RESULT: usize = 4;

// ── Tone ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Polite,
    Direct,
    Witty,
    Business,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Polite, Tone::Direct, Tone::Witty, Tone::Business];

    /// Display label, also embedded in the prompt as the preferred tone.
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Polite => "정중하게",
            Tone::Direct => "단호하게",
            Tone::Witty => "재치있게",
            Tone::Business => "업무적으로",
        }
    }

    pub fn english_name(&self) -> &'static str {
        match self {
            Tone::Polite => "Polite",
            Tone::Direct => "Direct",
            Tone::Witty => "Witty",
            Tone::Business => "Business",
        }
    }
}

// ── Language ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
    Ja,
    Zh,
}

impl Language {
    /// Native display name, used in the prompt as the output language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Ko => "한국어",
            Language::En => "English",
            Language::Ja => "日本語",
            Language::Zh => "中文",
        }
    }

    /// BCP-47 tag handed to the speech engines.
    pub fn speech_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko-KR",
            Language::En => "en-US",
            Language::Ja => "ja-JP",
            Language::Zh => "zh-CN",
        }
    }
}

// ── Candidates ─────────────────────────────────────────

/// Colour band of a gentleness score on a result card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Gentle,
    Moderate,
    Harsh,
}

/// One generated refusal phrase. Two candidates are the same favorite
/// when their `text` matches exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefusalCandidate {
    pub tone: String,
    pub text: String,
    pub score: u8,
}

impl RefusalCandidate {
    pub fn is_high_scorer(&self) -> bool {
        self.score >= HIGH_SCORE_THRESHOLD
    }

    pub fn score_band(&self) -> ScoreBand {
        match self.score {
            80.. => ScoreBand::Gentle,
            60..=79 => ScoreBand::Moderate,
            _ => ScoreBand::Harsh,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub situation: String,
    pub tone: Tone,
    pub language: Language,
}

impl GenerationRequest {
    pub fn new(situation: impl Into<String>, tone: Tone, language: Language) -> Self {
        Self {
            situation: situation.into(),
            tone,
            language,
        }
    }
}

/// Output of one generation call. Always `CANDIDATES_PER_RESULT` items long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub refusals: Vec<RefusalCandidate>,
}

/// Whether a situation text is long enough to auto-submit: more than
/// `min_chars` characters once trimmed. Counts characters, not bytes.
pub fn is_submittable(situation: &str, min_chars: usize) -> bool {
    situation.trim().chars().count() > min_chars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(score: u8) -> RefusalCandidate {
        RefusalCandidate {
            tone: Tone::Polite.label().to_string(),
            text: "미안, 오늘은 어려울 것 같아.".to_string(),
            score,
        }
    }

    #[test]
    fn high_scorer_threshold_is_inclusive() {
        assert!(candidate(90).is_high_scorer());
        assert!(candidate(100).is_high_scorer());
        assert!(!candidate(89).is_high_scorer());
    }

    #[test]
    fn score_bands() {
        assert_eq!(candidate(80).score_band(), ScoreBand::Gentle);
        assert_eq!(candidate(79).score_band(), ScoreBand::Moderate);
        assert_eq!(candidate(60).score_band(), ScoreBand::Moderate);
        assert_eq!(candidate(59).score_band(), ScoreBand::Harsh);
        assert_eq!(candidate(0).score_band(), ScoreBand::Harsh);
    }

    #[test]
    fn submittable_counts_trimmed_characters() {
        assert!(!is_submittable("", MIN_SITUATION_CHARS));
        assert!(!is_submittable("     hello     ", MIN_SITUATION_CHARS));
        assert!(is_submittable("hello!", MIN_SITUATION_CHARS));
        // Hangul syllables count one each
        assert!(!is_submittable("주말 근무", MIN_SITUATION_CHARS));
        assert!(is_submittable("상사가 주말 근무를 요청함", MIN_SITUATION_CHARS));
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(serde_json::to_value(Tone::Business).unwrap(), "business");
        assert_eq!(serde_json::to_value(Language::Ja).unwrap(), "ja");
        let lang: Language = serde_json::from_str("\"zh\"").unwrap();
        assert_eq!(lang.speech_code(), "zh-CN");
    }
}
