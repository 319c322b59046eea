//! LLM provider implementations for codeact.
//!
//! All providers implement the `codeact_core::Provider` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
