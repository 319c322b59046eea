//! Error types for the codeact domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all codeact operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Execution session errors ---
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    // --- Knowledge retrieval errors ---
    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Empty completion: provider returned no choices")]
    EmptyCompletion,

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Kernel gateway unreachable: {0}")]
    GatewayUnreachable(String),

    #[error("Kernel start failed: {message} (status: {status_code})")]
    StartFailed { status_code: u16, message: String },

    #[error("No active kernel — call start() first")]
    NotStarted,

    #[error("WebSocket channel error: {0}")]
    Channel(String),

    #[error("Malformed kernel message: {0}")]
    Protocol(String),
}

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Failed to load knowledge directory {path}: {reason}")]
    LoadFailed { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn session_error_displays_correctly() {
        let err = Error::Session(SessionError::NotStarted);
        assert!(err.to_string().contains("start()"));
    }

    #[test]
    fn knowledge_error_displays_correctly() {
        let err = Error::Knowledge(KnowledgeError::LoadFailed {
            path: "./knowledge".into(),
            reason: "permission denied".into(),
        });
        assert!(err.to_string().contains("./knowledge"));
        assert!(err.to_string().contains("permission denied"));
    }
}
