//! Knowledge retrieval for codeact.
//!
//! The baseline backend is a directory of `.txt` documents searched by
//! keyword overlap. Vector-index retrievers plug in behind the same
//! `codeact_core::KnowledgeRetriever` trait.

pub mod store;

pub use store::DirectoryRetriever;
