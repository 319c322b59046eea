//! Directory-backed keyword retriever.
//!
//! Loads every `.txt` file under a knowledge directory as one whole-file
//! document. Search scores documents by query-term occurrences normalized
//! by document length. An empty store answers every query with the
//! placeholder snippet — a valid result by contract, not an error.

use async_trait::async_trait;
use codeact_core::error::KnowledgeError;
use codeact_core::knowledge::{KnowledgeRetriever, EMPTY_KNOWLEDGE_PLACEHOLDER};
use std::path::Path;
use tracing::{debug, info};

/// A single loaded document.
#[derive(Debug, Clone)]
struct Document {
    source: String,
    content: String,
}

/// Keyword retriever over a directory of text files.
pub struct DirectoryRetriever {
    documents: Vec<Document>,
}

impl DirectoryRetriever {
    /// Load all `.txt` documents from `dir`. A missing directory yields an
    /// empty store (and a log line), matching the degenerate-but-usable
    /// contract of the retrieval collaborator.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let dir = dir.as_ref();

        if !dir.exists() {
            info!(dir = %dir.display(), "Knowledge directory not found; store is empty");
            return Ok(Self {
                documents: Vec::new(),
            });
        }

        let entries = std::fs::read_dir(dir).map_err(|e| KnowledgeError::LoadFailed {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut documents = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| KnowledgeError::LoadFailed {
                path: dir.display().to_string(),
                reason: e.to_string(),
            })?;
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "txt") {
                continue;
            }

            let content =
                std::fs::read_to_string(&path).map_err(|e| KnowledgeError::LoadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;

            documents.push(Document {
                source: path.display().to_string(),
                content,
            });
        }

        info!(count = documents.len(), dir = %dir.display(), "Loaded knowledge documents");
        Ok(Self { documents })
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Keyword relevance: occurrence count of query terms, normalized by
    /// document length so short focused documents outrank long rambling ones.
    fn score(content: &str, terms: &[String]) -> f32 {
        let haystack = content.to_lowercase();
        let occurrences: usize = terms.iter().map(|t| haystack.matches(t.as_str()).count()).sum();
        occurrences as f32 / (content.len() as f32 / 100.0).max(1.0)
    }
}

#[async_trait]
impl KnowledgeRetriever for DirectoryRetriever {
    fn name(&self) -> &str {
        "directory"
    }

    async fn search(
        &self,
        query: &str,
        k: usize,
    ) -> std::result::Result<Vec<String>, KnowledgeError> {
        if self.documents.is_empty() {
            return Ok(vec![EMPTY_KNOWLEDGE_PLACEHOLDER.to_string()]);
        }

        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .filter(|t| t.len() > 2)
            .map(String::from)
            .collect();

        let mut scored: Vec<(f32, &Document)> = self
            .documents
            .iter()
            .map(|d| (Self::score(&d.content, &terms), d))
            .filter(|(score, _)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        match scored.first() {
            Some((score, top)) => {
                debug!(query = %query, hits = scored.len(), top = %top.source, score = %score, "Knowledge search")
            }
            None => debug!(query = %query, hits = 0, "Knowledge search"),
        }

        Ok(scored
            .into_iter()
            .map(|(_, d)| d.content.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(files: &[(&str, &str)]) -> (tempfile::TempDir, DirectoryRetriever) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        let store = DirectoryRetriever::from_dir(dir.path()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn empty_store_returns_placeholder() {
        let (_dir, store) = store_with(&[]);
        let results = store.search("what is artificial intelligence", 3).await.unwrap();
        assert_eq!(results, vec![EMPTY_KNOWLEDGE_PLACEHOLDER.to_string()]);
    }

    #[tokio::test]
    async fn missing_directory_yields_empty_store() {
        let store = DirectoryRetriever::from_dir("/nonexistent/knowledge").unwrap();
        assert!(store.is_empty());
        let results = store.search("anything", 3).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn relevant_document_ranks_first() {
        let (_dir, store) = store_with(&[
            ("ai.txt", "Artificial intelligence is the simulation of human intelligence in machines."),
            ("python.txt", "Python is a high-level programming language."),
        ]);
        let results = store.search("what is artificial intelligence", 3).await.unwrap();
        assert!(!results.is_empty());
        assert!(results[0].contains("Artificial intelligence"));
    }

    #[tokio::test]
    async fn k_limits_results() {
        let (_dir, store) = store_with(&[
            ("a.txt", "rust language one"),
            ("b.txt", "rust language two"),
            ("c.txt", "rust language three"),
        ]);
        let results = store.search("rust language", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn non_txt_files_ignored() {
        let (_dir, store) = store_with(&[("notes.md", "rust rust rust")]);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn no_matches_returns_empty() {
        let (_dir, store) = store_with(&[("ai.txt", "machine learning content")]);
        let results = store.search("quantum chromodynamics", 3).await.unwrap();
        assert!(results.is_empty());
    }
}
