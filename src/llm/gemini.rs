use super::interface::{GenerationError, RefusalGenerator};
use super::llm_config::{GenerationConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use super::prompts;
use crate::models::{
    GenerationRequest, GenerationResult, RefusalCandidate, CANDIDATES_PER_RESULT,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

// ── Wire Types ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub response_mime_type: String,
    pub response_schema: Value,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefusalsPayload {
    refusals: Vec<RawRefusal>,
}

#[derive(Debug, Deserialize)]
struct RawRefusal {
    tone: String,
    text: String,
    score: i64,
}

// ── Client ─────────────────────────────────────────────

/// Gemini `generateContent` client constrained to the refusal schema.
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    /// Build a client from the persisted settings. Blank base URL or model
    /// fall back to the defaults; a blank key counts as missing.
    pub fn from_config(config: &GenerationConfig) -> Self {
        let base_url = match config.base_url.trim().trim_end_matches('/') {
            "" => DEFAULT_BASE_URL.to_string(),
            url => url.to_string(),
        };
        let model = match config.model.trim() {
            "" => DEFAULT_MODEL.to_string(),
            model => model.to_string(),
        };
        tracing::info!(
            "[LLM] Initializing Gemini client: base_url={}, model={}",
            base_url,
            model
        );
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key: config.resolve_api_key(),
            base_url,
            model,
            temperature: config.temperature,
        }
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Request body for one generation.
    pub fn build_body(&self, request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompts::build_prompt(request),
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: prompts::system_instruction(request.language),
                }],
            },
            generation_config: GenerationParams {
                response_mime_type: "application/json".to_string(),
                response_schema: prompts::response_schema(),
                temperature: self.temperature,
            },
        }
    }
}

#[async_trait]
impl RefusalGenerator for GeminiClient {
    fn id(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let body = self.build_body(request);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("envelope: {}", e)))?;

        let text = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| GenerationError::InvalidResponse("no candidates".to_string()))?;

        parse_refusals(&text)
    }
}

/// Parse and validate the model's JSON text into a result.
pub fn parse_refusals(raw: &str) -> Result<GenerationResult, GenerationError> {
    let payload: RefusalsPayload = serde_json::from_str(raw.trim())
        .map_err(|e| GenerationError::InvalidResponse(format!("payload: {}", e)))?;

    if payload.refusals.len() != CANDIDATES_PER_RESULT {
        return Err(GenerationError::InvalidResponse(format!(
            "expected {} refusals, got {}",
            CANDIDATES_PER_RESULT,
            payload.refusals.len()
        )));
    }

    let refusals = payload
        .refusals
        .into_iter()
        .map(|raw| {
            let score = u8::try_from(raw.score)
                .ok()
                .filter(|s| *s <= 100)
                .ok_or_else(|| {
                    GenerationError::InvalidResponse(format!("score out of range: {}", raw.score))
                })?;
            if raw.text.trim().is_empty() {
                return Err(GenerationError::InvalidResponse("empty refusal text".to_string()));
            }
            Ok(RefusalCandidate {
                tone: raw.tone,
                text: raw.text,
                score,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GenerationResult { refusals })
}
