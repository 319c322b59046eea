//! The one-shot planning call made before the execution loop starts.

use std::sync::Arc;

use codeact_core::{Message, Provider, ProviderError, ProviderRequest};
use tracing::info;

use crate::prompts::planner_prompt;

/// Produces the initial markdown plan for a task with a single deterministic
/// model call. The planner never sees the event stream; it gets only the task
/// and, for question tasks, the retrieved context.
pub struct Planner {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl Planner {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: String,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Self {
        Self {
            provider,
            model,
            temperature,
            max_tokens,
        }
    }

    pub async fn create_plan(&self, task: &str, context: &str) -> Result<String, ProviderError> {
        let mut prompt = planner_prompt(task);
        if !context.is_empty() {
            prompt.push_str("\n\nRelevant context:\n");
            prompt.push_str(context);
        }

        let messages = vec![Message::user(prompt)];
        let mut request = ProviderRequest::new(&self.model, &messages, self.temperature);
        request.max_tokens = self.max_tokens;

        info!(model = %self.model, "requesting task plan");
        let response = self.provider.complete(request).await?;
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_helpers::SequentialMockProvider;

    #[tokio::test]
    async fn plan_request_is_deterministic() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            "- [ ] Step 1: Do X.".to_string(),
        ]));
        let planner = Planner::new(provider.clone(), "test-model".to_string(), 0.0, None);

        let plan = planner.create_plan("Do X", "").await.unwrap();
        assert_eq!(plan, "- [ ] Step 1: Do X.");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, 0.0);
        assert_eq!(requests[0].messages.len(), 1);
        assert!(requests[0].messages[0].content.contains("\"Do X\""));
        assert!(!requests[0].messages[0].content.contains("Relevant context:"));
    }

    #[tokio::test]
    async fn context_is_appended_when_present() {
        let provider = Arc::new(SequentialMockProvider::new(vec!["plan".to_string()]));
        let planner = Planner::new(provider.clone(), "test-model".to_string(), 0.0, None);

        planner
            .create_plan("What is gravity?", "- gravity fact")
            .await
            .unwrap();

        let requests = provider.requests();
        assert!(requests[0].messages[0]
            .content
            .contains("Relevant context:\n- gravity fact"));
    }
}
