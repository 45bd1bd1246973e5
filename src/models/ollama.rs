use serde::{Deserialize, Serialize};

/// Ollama `/api/generate` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model to use
    pub model: String,
    /// Fully rendered prompt
    pub prompt: String,
    /// Always false: one complete answer per call
    pub stream: bool,
}

/// Ollama `/api/generate` response (non-streaming)
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub model: Option<String>,
    /// Generated text
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    /// Server-side generation time in nanoseconds
    #[serde(default)]
    pub total_duration: Option<u64>,
}

/// Ollama error body, e.g. `{"error": "model 'foo' not found"}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_serialization() {
        let request = GenerateRequest {
            model: "mistral".to_string(),
            prompt: "Hello".to_string(),
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "mistral");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_generate_response_tolerates_extra_fields() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"model":"llama3","created_at":"2025-01-12T09:30:00Z","response":"Hi!","done":true,"context":[1,2,3],"total_duration":5043500667}"#,
        )
        .unwrap();
        assert_eq!(response.response, "Hi!");
        assert!(response.done);
        assert_eq!(response.total_duration, Some(5043500667));
    }
}
