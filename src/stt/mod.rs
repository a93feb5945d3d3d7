#[cfg(feature = "desktop")]
pub mod browser;
pub mod config;
pub mod interface;
pub mod service;

pub use config::{load_config, RecognitionConfig};
pub use interface::{
    RecognitionBatch, RecognitionEngine, RecognitionError, RecognitionSegment,
    RecognitionSettings, RecognitionState,
};
pub use service::{SpeechInput, TranscriptSink};
