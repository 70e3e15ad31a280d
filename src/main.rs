use candidate_registry::config::cli::Command;
use candidate_registry::utils::{logger, validation::Validate};
use candidate_registry::{CandidateRegistry, CliConfig, JsonFileStore, RegistryError};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match cli.resolve().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(config.log_level());
    }
    tracing::debug!("Resolved config: {:?}", config);

    let store = JsonFileStore::from_config(&config);
    let registry = match CandidateRegistry::load(store).await {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            // 不要用空集合覆蓋掉讀不到的檔案
            tracing::error!("❌ Failed to load candidates: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let outcome = run(Arc::clone(&registry), cli.command).await;

    // 等背景寫入完成，再做最後一次保存
    registry.shutdown().await;

    match outcome {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("❌ Command failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    }
}

/// Exit code is 0 on success and 1 when the command changed nothing
/// (duplicate, not found, failed save).
async fn run(
    registry: Arc<CandidateRegistry<JsonFileStore>>,
    command: Command,
) -> Result<i32, RegistryError> {
    let code = match command {
        Command::List => print_json(&registry.list().await)?,
        Command::Search { term } => print_json(&registry.search(&term).await)?,
        Command::Get { email } => match registry.get(&email).await {
            Some(candidate) => print_json(&candidate)?,
            None => report(false, "", &format!("No candidate with email {}", email)),
        },
        Command::Add(args) => {
            let added = registry.add(args.into()).await?;
            report(added, "Candidate added", "A candidate with this email already exists")
        }
        Command::Update { email, patch } => {
            let updated = registry.update(&email, patch.into()).await?;
            report(
                updated,
                &format!("Candidate {} updated", email),
                &format!("No candidate with email {}", email),
            )
        }
        Command::Remove { email } => {
            let removed = registry.remove(&email).await?;
            report(
                removed,
                &format!("Candidate {} removed", email),
                &format!("No candidate with email {}", email),
            )
        }
        Command::Save => {
            let saved = registry.save_snapshot().await;
            report(
                saved,
                &format!("Saved {} candidates", registry.len().await),
                "Save failed, see the log for details",
            )
        }
    };
    Ok(code)
}

fn print_json<T: Serialize>(value: &T) -> Result<i32, RegistryError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(0)
}

fn report(ok: bool, success: &str, failure: &str) -> i32 {
    if ok {
        println!("✅ {}", success);
        0
    } else {
        println!("⚠️  {}", failure);
        1
    }
}
