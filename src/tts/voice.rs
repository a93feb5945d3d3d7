//! Voice selection for a requested language.

use super::config::SpeechOutputConfig;
use super::interface::Voice;

/// "ko-KR" → "ko"
pub fn primary_subtag(lang: &str) -> &str {
    lang.split(['-', '_']).next().unwrap_or(lang)
}

/// Pick the best installed voice for `lang`, among voices sharing its
/// primary subtag:
/// 1. a preferred named voice,
/// 2. an on-device voice from a known vendor,
/// 3. any matching voice.
///
/// `None` means "let the engine decide".
pub fn select_voice<'a>(
    voices: &'a [Voice],
    lang: &str,
    config: &SpeechOutputConfig,
) -> Option<&'a Voice> {
    let prefix = primary_subtag(lang);
    let matching: Vec<&Voice> = voices.iter().filter(|v| v.lang.starts_with(prefix)).collect();

    let named = matching
        .iter()
        .find(|v| config.preferred_voices.iter().any(|name| *name == v.name));
    let native = || {
        matching.iter().find(|v| {
            v.local_service
                && config
                    .native_vendors
                    .iter()
                    .any(|vendor| v.name.contains(vendor.as_str()))
        })
    };

    named.or_else(native).or(matching.first()).copied()
}
