use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use freight_console::cli::Cli;
use freight_console::clients::ApiClient;
use freight_console::commands::{self, ConfirmPrompt};
use freight_console::config::EnvironmentConfig;
use freight_console::services::MemoryNotifier;
use freight_console::AppState;

/// Confirmación del diálogo de borrado por la terminal
struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&self, title: &str, description: &str) -> bool {
        eprintln!("{}", title);
        eprintln!("{}", description);
        eprint!("Confirmar? [s/N] ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let cli = Cli::parse();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging (RUST_LOG tiene prioridad sobre --verbose)
    let default_level = if cli.verbose {
        "debug"
    } else if config.is_development() {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    debug!("🚚 Consola de fretes contra {} ({})", config.api_base_url, config.environment);

    let notifier = Arc::new(MemoryNotifier::new());
    let client = ApiClient::new(&config)?;
    let state = AppState::new(config, Arc::new(client), notifier.clone());

    let result = commands::run(&cli.command, cli.format, &state, &StdinPrompt).await;

    state.cache.garbage_collect().await;
    debug!("📊 Cache: {:?}", state.cache.stats());

    for notification in notifier.drain() {
        eprintln!("{} {}", notification.level, notification.message);
    }

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
        Err(e) => {
            if e.is_network() {
                error!("🌐 Fallo de comunicación con {}: {}", state.config.api_base_url, e);
            } else {
                error!("❌ {}", e);
            }
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
