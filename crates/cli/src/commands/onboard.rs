//! `codeact onboard` — First-time setup.

use codeact_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🤖 codeact — First-Time Setup");
    println!("=============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
    }

    // Knowledge directory from the (possibly fresh) config
    let config = AppConfig::load().unwrap_or_default();
    let knowledge_dir = std::path::Path::new(&config.knowledge.dir);
    if !knowledge_dir.exists() {
        std::fs::create_dir_all(knowledge_dir)?;
        std::fs::write(
            knowledge_dir.join("README.txt"),
            concat!(
                "Drop .txt documents in this directory to give the agent a\n",
                "knowledge base. Question-style tasks (\"what is ...\", \"tell me\n",
                "about ...\") trigger a search over these files, and the best\n",
                "matches are injected into the agent's context.\n",
            ),
        )?;
        println!("✅ Created knowledge directory: {}", knowledge_dir.display());
    }

    println!("\n📝 Next steps:");
    println!("   1. Point [llm] api_base at your completion server");
    println!("   2. Point [gateway] url at your Jupyter Kernel Gateway");
    println!("   3. Run: codeact run \"your task here\"\n");

    Ok(())
}
