//! Gemini client for document summarization and metadata extraction.
//!
//! Talks to the Generative Language REST API (`generateContent`).
//! One client is built at startup and shared by reference; there is no
//! retry, caching or rate limiting at this layer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::error::LlmError;
use super::types::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};
use crate::config::GeminiConfig;

/// Anything that can answer a `generateContent` request.
///
/// Implemented by [`GeminiClient`]; tests substitute their own.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Issue a single request and return the decoded reply.
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError>;
}

/// HTTP client bound to one API key and model.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

/// Envelope the API wraps errors in on non-2xx responses.
#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

impl GeminiClient {
    /// Create a client from configuration.
    ///
    /// Fails with [`LlmError::MissingApiKey`] when no key was resolved.
    pub fn new(config: &GeminiConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey)?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the `generateContent` method for the configured model.
    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError> {
        let url = self.url();
        debug!("Gemini request to {}", url);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|env| env.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        if let Some(error) = &reply.error {
            return Err(LlmError::Api {
                status: error.code.unwrap_or(status.as_u16()),
                message: error.message.clone(),
            });
        }

        if let Some(usage) = &reply.usage_metadata {
            debug!(
                "Gemini usage: prompt={:?} candidates={:?} total={:?}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        Ok(reply)
    }
}
