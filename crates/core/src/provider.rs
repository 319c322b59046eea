//! Provider trait — the abstraction over LLM backends.
//!
//! A Provider knows how to send the event stream to an LLM and get a
//! completion back. The orchestrator and planner call `complete()` without
//! knowing which backend is configured.
//!
//! Implementations: OpenAI-compatible endpoints (vLLM, Ollama, OpenRouter,
//! OpenAI itself).

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "CodeActAgent-Mistral-7b-v0.1", "gpt-4o")
    pub model: String,

    /// The ordered messages forming the full context
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.1
}

impl ProviderRequest {
    /// Build a request from a message slice with the given sampling temperature.
    pub fn new(model: impl Into<String>, messages: &[Message], temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages: messages.to_vec(),
            temperature,
            max_tokens: None,
        }
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated completion text
    pub content: String,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// Deterministic at temperature 0.0 — the planner relies on this.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "vllm", "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_from_messages() {
        let messages = vec![Message::system("rules"), Message::user("objective")];
        let req = ProviderRequest::new("mock-model", &messages, 0.0);
        assert_eq!(req.messages.len(), 2);
        assert!(req.temperature.abs() < f32::EPSILON);
        assert!(req.max_tokens.is_none());
    }

    #[test]
    fn request_serializes_roles() {
        let req = ProviderRequest::new("m", &[Message::assistant("```python\npass\n```")], 0.1);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"assistant\""));
    }
}
