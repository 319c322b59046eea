//! `codeact run` — Drive one task through the agent loop.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use codeact_agent::{Orchestrator, RunOutcome};
use codeact_config::AppConfig;
use codeact_kernel::KernelGatewaySession;
use codeact_knowledge::DirectoryRetriever;
use codeact_providers::OpenAiCompatProvider;

pub async fn run(task: &str, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .map_err(|e| format!("Failed to load config: {e}"))?;

    let provider: Arc<OpenAiCompatProvider> = match &config.api_key {
        Some(key) => Arc::new(OpenAiCompatProvider::new("llm", &config.llm.api_base, key)),
        // Local vLLM-style servers accept any bearer token
        None => Arc::new(OpenAiCompatProvider::vllm(&config.llm.api_base)),
    };

    let session = Arc::new(KernelGatewaySession::new(
        &config.gateway.url,
        Duration::from_secs(config.policy.execute_timeout_secs),
    ));

    let retriever = Arc::new(
        DirectoryRetriever::from_dir(&config.knowledge.dir)
            .map_err(|e| format!("Failed to load knowledge base: {e}"))?,
    );

    println!("🤖 codeact — starting run");
    println!("   Task: {task}");
    println!("   Model: {}", config.llm.model);
    println!("   Gateway: {}\n", config.gateway.url);

    let mut orchestrator = Orchestrator::new(provider, session, retriever, &config);
    let outcome = orchestrator.run(task).await?;

    println!();
    match outcome {
        RunOutcome::Completed => println!("✅ Task completed."),
        RunOutcome::Stalled => println!("⚠️  Run stalled: the model stopped producing code."),
    }

    // Final transcript summary
    let stream = orchestrator.event_stream();
    println!("   {} event(s) recorded.", stream.len());

    Ok(())
}
