//! Generative feedback backends.
//!
//! [`FeedbackModel`] is the seam between the evaluator and any text-generation service; the
//! evaluator owns prompt construction and response validation, a model only moves text.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::EvaluatorConfig;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Request(String),
    #[error("model returned status {0}")]
    Status(u16),
    #[error("model response carried no text candidate")]
    MissingText,
}

/// Text-generation service that answers a prompt with (ideally) a JSON document.
#[async_trait]
pub trait FeedbackModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    /// Build a client from configuration; `None` when no API key is configured.
    pub fn from_config(config: &EvaluatorConfig) -> Result<Option<Self>, ModelError> {
        let Some(api_key) = config.gemini_api_key.clone() else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ModelError::Request(err.to_string()))?;

        Ok(Some(Self::new(
            client,
            api_key,
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
        )))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl FeedbackModel for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|err| ModelError::Request(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ModelError::Status(response.status().as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| ModelError::Request(err.to_string()))?;

        candidate_text(&body)
            .map(str::to_string)
            .ok_or(ModelError::MissingText)
    }
}

/// First candidate's text part, falling back to its inline data.
pub(crate) fn candidate_text(body: &Value) -> Option<&str> {
    let part = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?;

    part.get("text")
        .and_then(Value::as_str)
        .or_else(|| part.get("inlineData")?.get("data")?.as_str())
}
