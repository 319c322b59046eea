//! # codeact Core
//!
//! Domain types, traits, and error definitions for the codeact agent runtime.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every remote collaborator (completion provider, execution session,
//! knowledge retriever) is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod knowledge;
pub mod message;
pub mod provider;
pub mod session;

// Re-export key types at crate root for ergonomics
pub use error::{Error, KnowledgeError, ProviderError, Result, SessionError};
pub use knowledge::{KnowledgeRetriever, EMPTY_KNOWLEDGE_PLACEHOLDER};
pub use message::{EventStream, Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use session::{ExecutionOutput, ExecutionSession};
