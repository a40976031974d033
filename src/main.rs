//! designcoach - guided conversations for learning design
//!
//! CLI entry point.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use designcoach::cli::{Cli, Command};
use designcoach::config::Config;
use designcoach::llm::create_client;
use designcoach::prompts::PromptLoader;
use designcoach::repl::ChatRepl;

fn setup_logging(verbose: bool) -> Result<()> {
    // Log to a file, not stdout - the terminal belongs to the conversation
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("designcoach")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("designcoach.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "designcoach loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    // Surface configuration problems before any network call
    if let Err(e) = config.validate() {
        eprintln!("{} {}", "⚠️ Konfigurationsfel:".red(), e);
        std::process::exit(1);
    }

    let initial_message = match cli.command {
        Some(Command::Chat { message }) => message,
        None => None,
    };

    let llm = match create_client(&config.llm) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{} {}", "⚠️ Konfigurationsfel:".red(), e);
            std::process::exit(1);
        }
    };

    let prompts = Arc::new(PromptLoader::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))));

    let mut repl = ChatRepl::new(llm, prompts, &config);
    repl.run(initial_message).await
}
