//! `codeact doctor` — Diagnose system health.

use std::time::Duration;

use codeact_config::AppConfig;
use codeact_core::{ExecutionSession, Provider};
use codeact_kernel::KernelGatewaySession;
use codeact_knowledge::DirectoryRetriever;
use codeact_providers::OpenAiCompatProvider;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 codeact Doctor — System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                Some(config)
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  ⚠️  No config file — run `codeact onboard` (using defaults)");
        Some(AppConfig::default())
    };

    if let Some(config) = config {
        // Completion server
        let provider = match &config.api_key {
            Some(key) => OpenAiCompatProvider::new("llm", &config.llm.api_base, key),
            None => OpenAiCompatProvider::vllm(&config.llm.api_base),
        };
        match provider.health_check().await {
            Ok(true) => println!("  ✅ Completion server reachable: {}", config.llm.api_base),
            _ => {
                println!("  ❌ Completion server unreachable: {}", config.llm.api_base);
                issues += 1;
            }
        }

        // Kernel gateway: start a kernel and release it again
        let session = KernelGatewaySession::new(&config.gateway.url, Duration::from_secs(10));
        match session.start().await {
            Ok(kernel_id) => {
                println!("  ✅ Kernel gateway reachable (kernel {kernel_id})");
                if let Err(e) = session.shutdown().await {
                    println!("  ⚠️  Test kernel not released: {e}");
                }
            }
            Err(e) => {
                println!("  ❌ Kernel gateway unreachable: {e}");
                issues += 1;
            }
        }

        // Knowledge base
        match DirectoryRetriever::from_dir(&config.knowledge.dir) {
            Ok(store) if store.is_empty() => {
                println!("  ⚠️  Knowledge base empty: {}", config.knowledge.dir);
            }
            Ok(store) => println!("  ✅ Knowledge base loaded ({} document(s))", store.len()),
            Err(e) => {
                println!("  ❌ Knowledge base failed to load: {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
