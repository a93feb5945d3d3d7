//! Generation client contract and error kinds.

use crate::models::{GenerationRequest, GenerationResult};
use async_trait::async_trait;
use thiserror::Error;

/// Shown for every failure except a missing credential.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "AI 응답을 생성하는 데 실패했습니다. 잠시 후 다시 시도해주세요.";

// ── Error Types ────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API_KEY is not set in environment variables.")]
    MissingCredential,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("API Error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    /// Text the UI shows for this failure.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::MissingCredential => self.to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Request(e.to_string())
    }
}

// For Tauri command return compatibility
impl From<GenerationError> for String {
    fn from(e: GenerationError) -> String {
        e.user_message()
    }
}

// ── Generator Trait ────────────────────────────────────

/// Anything that can turn a situation into four refusal candidates.
#[async_trait]
pub trait RefusalGenerator: Send + Sync {
    /// Provider identifier (e.g. "gemini").
    fn id(&self) -> &str;

    /// One attempt, no retry and no caching.
    async fn generate(&self, request: &GenerationRequest)
        -> Result<GenerationResult, GenerationError>;
}
