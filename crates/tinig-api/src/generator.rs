//! Text generation for the daily quote.
//!
//! The quote cache only needs "prompt in, text out", so the provider sits
//! behind [`TextGenerator`]. [`GeminiGenerator`] talks to Google's
//! `generateContent` REST endpoint; [`Unconfigured`] stands in when no API
//! key is set and makes every day fall back to the static quote.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("text generator is not configured")]
    NotConfigured,

    #[error("generator request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generator returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generator reply had no text")]
    Empty,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Single-shot generation, no streaming.
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

pub struct Unconfigured;

#[async_trait]
impl TextGenerator for Unconfigured {
    async fn generate(&self, _prompt: &str) -> Result<String, GeneratorError> {
        Err(GeneratorError::NotConfigured)
    }
}

#[derive(Clone)]
pub struct GeminiGenerator {
    base_url: String,
    model: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl GeminiGenerator {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, GeneratorError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            http_client: reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let resp = self
            .http_client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(GeneratorError::Status { status, body });
        }

        let reply: GenerateResponse = resp.json().await?;
        reply.text().ok_or(GeneratorError::Empty)
    }
}

// -- Wire format (only the fields we use) --

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let first = self.candidates.first()?;
        let text: String = first
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}
