//! KnowledgeRetriever trait — the abstraction over snippet retrieval.
//!
//! The injector consults this when a task looks like a question. Index
//! construction and nearest-neighbor search are implementation concerns;
//! the core only depends on `search(query, k) -> snippets`.

use crate::error::KnowledgeError;
use async_trait::async_trait;

/// The snippet a retriever returns when its store holds no documents.
///
/// This is a valid result, not an empty one — it flows through injection
/// like any other snippet.
pub const EMPTY_KNOWLEDGE_PLACEHOLDER: &str = "The knowledge base is empty.";

/// A knowledge retrieval backend.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// A human-readable name for this retriever.
    fn name(&self) -> &str;

    /// Return up to `k` snippets relevant to `query`, most relevant first.
    /// An empty store yields `[EMPTY_KNOWLEDGE_PLACEHOLDER]`.
    async fn search(
        &self,
        query: &str,
        k: usize,
    ) -> std::result::Result<Vec<String>, KnowledgeError>;
}
