//! Configuration loading, validation, and management for codeact.
//!
//! Loads configuration from `~/.codeact/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! Every policy constant the control loop depends on — the termination
//! sentinel, the retrieval trigger phrases, the repeat-failure threshold,
//! the kernel drain timeout, the empty-completion behavior — lives here as
//! a named value rather than an embedded literal, so loop policy is
//! testable in isolation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.codeact/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Completion provider settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Kernel gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Knowledge retrieval settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Control loop policy
    #[serde(default)]
    pub policy: LoopPolicy,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("llm", &self.llm)
            .field("gateway", &self.gateway)
            .field("knowledge", &self.knowledge)
            .field("policy", &self.policy)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model name as served by the endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// Temperature for planning (deterministic by design)
    #[serde(default)]
    pub planner_temperature: f32,

    /// Temperature for in-loop completions
    #[serde(default = "default_loop_temperature")]
    pub loop_temperature: f32,

    /// Maximum tokens per completion (None = provider default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_api_base() -> String {
    "http://llm-server:8000/v1".into()
}
fn default_model() -> String {
    "CodeActAgent-Mistral-7b-v0.1".into()
}
fn default_loop_temperature() -> f32 {
    0.1
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            planner_temperature: 0.0,
            loop_temperature: default_loop_temperature(),
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP base URL of the Jupyter Kernel Gateway
    #[serde(default = "default_gateway_url")]
    pub url: String,
}

fn default_gateway_url() -> String {
    "http://code-executor:8888".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Directory of `.txt` documents to index
    #[serde(default = "default_knowledge_dir")]
    pub dir: String,

    /// How many snippets to retrieve per injection
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_knowledge_dir() -> String {
    "./knowledge".into()
}
fn default_top_k() -> usize {
    3
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            dir: default_knowledge_dir(),
            top_k: default_top_k(),
        }
    }
}

/// Control loop policy — the named configuration behind every decision the
/// orchestrator makes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopPolicy {
    /// Substring in about-to-execute code that signals successful completion
    #[serde(default = "default_sentinel")]
    pub completion_sentinel: String,

    /// Case-insensitive phrases that mark a task as a question worth
    /// consulting the knowledge base for
    #[serde(default = "default_trigger_phrases")]
    pub knowledge_triggers: Vec<String>,

    /// Consecutive identical failures before the strategy-override
    /// directive is injected
    #[serde(default = "default_repeat_threshold")]
    pub repeat_failure_threshold: u32,

    /// Per-message timeout while draining kernel results, in seconds
    #[serde(default = "default_execute_timeout")]
    pub execute_timeout_secs: u64,

    /// Workspace path (inside the kernel) the plan is written to
    #[serde(default = "default_plan_path")]
    pub plan_path: String,

    /// What to do when a completion contains no extractable code
    #[serde(default)]
    pub on_empty_completion: EmptyCompletionPolicy,
}

fn default_sentinel() -> String {
    "TASK_COMPLETE".into()
}
fn default_trigger_phrases() -> Vec<String> {
    vec![
        "what is".into(),
        "who is".into(),
        "tell me about".into(),
        "how does".into(),
    ]
}
fn default_repeat_threshold() -> u32 {
    3
}
fn default_execute_timeout() -> u64 {
    10
}
fn default_plan_path() -> String {
    "workspace/todo.md".into()
}

impl Default for LoopPolicy {
    fn default() -> Self {
        Self {
            completion_sentinel: default_sentinel(),
            knowledge_triggers: default_trigger_phrases(),
            repeat_failure_threshold: default_repeat_threshold(),
            execute_timeout_secs: default_execute_timeout(),
            plan_path: default_plan_path(),
            on_empty_completion: EmptyCompletionPolicy::default(),
        }
    }
}

/// How the loop handles a completion with no extractable code block.
///
/// The baseline treats it as an implicit termination signal, which is
/// indistinguishable from successful completion in the stream itself. The
/// alternative retries the completion call once before giving up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyCompletionPolicy {
    /// End the run immediately (original behavior)
    #[default]
    Terminate,
    /// Issue one more completion call, then terminate if still empty
    RetryOnce,
}

impl AppConfig {
    /// Load configuration from the default path (~/.codeact/config.toml).
    ///
    /// Environment variable overrides:
    /// - `CODEACT_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `CODEACT_API_BASE`
    /// - `CODEACT_MODEL`
    /// - `CODEACT_GATEWAY_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("CODEACT_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(api_base) = std::env::var("CODEACT_API_BASE") {
            config.llm.api_base = api_base;
        }

        if let Ok(model) = std::env::var("CODEACT_MODEL") {
            config.llm.model = model;
        }

        if let Ok(url) = std::env::var("CODEACT_GATEWAY_URL") {
            config.gateway.url = url;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".codeact")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, t) in [
            ("planner_temperature", self.llm.planner_temperature),
            ("loop_temperature", self.llm.loop_temperature),
        ] {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0.0 and 2.0"
                )));
            }
        }

        if self.policy.repeat_failure_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "repeat_failure_threshold must be at least 1".into(),
            ));
        }

        if self.policy.execute_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "execute_timeout_secs must be at least 1".into(),
            ));
        }

        if self.policy.completion_sentinel.is_empty() {
            return Err(ConfigError::ValidationError(
                "completion_sentinel must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard`).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            llm: LlmConfig::default(),
            gateway: GatewayConfig::default(),
            knowledge: KnowledgeConfig::default(),
            policy: LoopPolicy::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.policy.completion_sentinel, "TASK_COMPLETE");
        assert_eq!(config.policy.repeat_failure_threshold, 3);
        assert_eq!(config.knowledge.top_k, 3);
        assert_eq!(
            config.policy.on_empty_completion,
            EmptyCompletionPolicy::Terminate
        );
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.llm.model, config.llm.model);
        assert_eq!(parsed.gateway.url, config.gateway.url);
        assert_eq!(
            parsed.policy.knowledge_triggers,
            config.policy.knowledge_triggers
        );
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            llm: LlmConfig {
                loop_temperature: 5.0,
                ..LlmConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_threshold_rejected() {
        let mut config = AppConfig::default();
        config.policy.repeat_failure_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_sentinel_rejected() {
        let mut config = AppConfig::default();
        config.policy.completion_sentinel.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().llm.model, default_model());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[llm]
model = "gpt-4o"
loop_temperature = 0.2

[policy]
completion_sentinel = "ALL_DONE"
on_empty_completion = "retry_once"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.policy.completion_sentinel, "ALL_DONE");
        assert_eq!(
            config.policy.on_empty_completion,
            EmptyCompletionPolicy::RetryOnce
        );
        // Unspecified sections keep defaults
        assert_eq!(config.gateway.url, default_gateway_url());
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("TASK_COMPLETE"));
        assert!(toml_str.contains("code-executor:8888"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
