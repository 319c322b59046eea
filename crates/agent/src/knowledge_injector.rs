//! Conditional retrieval and injection of knowledge-base context.

use std::sync::Arc;

use codeact_core::{EventStream, KnowledgeError, KnowledgeRetriever, Message};
use tracing::{debug, info};

use crate::prompts::{KNOWLEDGE_BEGIN_MARKER, KNOWLEDGE_END_MARKER};

/// Decides whether a task warrants a knowledge-base lookup and, when it
/// does, records the retrieved context in the event stream.
pub struct KnowledgeInjector {
    retriever: Arc<dyn KnowledgeRetriever>,
    triggers: Vec<String>,
    top_k: usize,
}

impl KnowledgeInjector {
    pub fn new(
        retriever: Arc<dyn KnowledgeRetriever>,
        triggers: Vec<String>,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            triggers,
            top_k,
        }
    }

    fn is_question(&self, task: &str) -> bool {
        let lowered = task.to_lowercase();
        self.triggers.iter().any(|t| lowered.contains(t.as_str()))
    }

    /// When the task matches a trigger phrase, searches the knowledge base,
    /// appends the results to the stream as a marker-wrapped system message,
    /// and returns the raw bulleted text for the planner. Non-question tasks
    /// return an empty string and leave the stream untouched.
    pub async fn maybe_inject(
        &self,
        task: &str,
        stream: &mut EventStream,
    ) -> Result<String, KnowledgeError> {
        if !self.is_question(task) {
            debug!("task did not match any knowledge trigger, skipping retrieval");
            return Ok(String::new());
        }

        info!(
            retriever = self.retriever.name(),
            top_k = self.top_k,
            "retrieving knowledge base context"
        );
        let snippets = self.retriever.search(task, self.top_k).await?;
        let context = snippets
            .iter()
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n");

        stream.append(Message::system(format!(
            "{KNOWLEDGE_BEGIN_MARKER}\nThe following information was retrieved from \
the knowledge base and may be relevant to the task:\n{context}\n{KNOWLEDGE_END_MARKER}"
        )));
        Ok(context)
    }
}
