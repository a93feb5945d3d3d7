#[cfg(feature = "desktop")]
pub mod browser;
pub mod config;
pub mod interface;
pub mod manager;
pub mod voice;

pub use config::{load_config, SpeechOutputConfig};
pub use interface::{SpeechError, SpeechState, SpeechSynthesizer, Utterance, Voice};
pub use manager::{SpeakOutcome, SpeechOutput};
