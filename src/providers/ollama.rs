use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{render_prompt, LanguageModel, ModelInput};
use crate::{
    config::ModelConfig,
    error::AppError,
    models::ollama::{ErrorResponse, GenerateRequest, GenerateResponse},
};

/// Client for a local Ollama server
pub struct OllamaClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn invoke(&self, model: &str, input: &ModelInput) -> Result<String, AppError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: model.to_string(),
            prompt: render_prompt(input),
            stream: false,
        };

        debug!(model, context_len = input.context.len(), "Calling Ollama");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        // Check for HTTP errors
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|e| e.error)
                .unwrap_or(error_text);
            return Err(AppError::ModelError {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = OllamaClient::new(&ModelConfig {
            base_url: "http://localhost:11434/".to_string(),
            ..ModelConfig::default()
        });
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.timeout, Duration::from_secs(600));
    }
}
