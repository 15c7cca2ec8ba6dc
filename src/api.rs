//! Chat-completion client for the Mistral API.
//!
//! The request handler only depends on the [`ChatCompletion`] trait, so the
//! HTTP client can be swapped for a fake in tests. [`MistralClient`] is the
//! production implementation and speaks the OpenAI-style
//! `/v1/chat/completions` format.
//!
//! There is no retry and no request timeout on this path: one failed call
//! fails the whole prediction.

use crate::error::PredictError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Default API endpoint root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.mistral.ai";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "mistral-tiny";

/// Trait for one-shot, non-streaming chat completion.
pub trait ChatCompletion {
    /// Send `prompt` as a single user message and return the decoded completion.
    fn complete(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<ChatCompletionResponse, PredictError>> + Send;
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

/// Decoded completion body. Only the fields the service reads are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice.
    ///
    /// # Errors
    ///
    /// [`PredictError::EmptyResponse`] when there are no choices, and
    /// [`PredictError::MissingContent`] when the first choice has no text.
    pub fn first_content(&self) -> Result<&str, PredictError> {
        let choice = self.choices.first().ok_or(PredictError::EmptyResponse)?;
        choice
            .message
            .content
            .as_deref()
            .ok_or(PredictError::MissingContent)
    }
}

/// Mistral chat-completion client.
///
/// The credential and model are fixed at construction and shared by every
/// request.
#[derive(Clone)]
pub struct MistralClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for MistralClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl MistralClient {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

impl ChatCompletion for MistralClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn complete(&self, prompt: &str) -> Result<ChatCompletionResponse, PredictError> {
        let t0 = Instant::now();
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Model API returned an error status"
            );
            return Err(PredictError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let completion: ChatCompletionResponse =
            serde_json::from_slice(&bytes).map_err(|e| PredictError::Decode(e.to_string()))?;

        info!(
            choices = completion.choices.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Model API call succeeded"
        );
        Ok(completion)
    }
}
