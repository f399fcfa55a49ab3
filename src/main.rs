use anyhow::{Context, Result};
use clap::Parser;
use clinicq::cli::{self, Cli, Commands, TokenCommand};
use clinicq::config::Config;
use clinicq::directory::Directory;
use clinicq::queue::share;
use clinicq::web_server::{AppState, WebServer};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments first to get debug flag
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("config.yaml"));
    let loaded = Config::load(&config_path)?;
    let found = loaded.is_some();
    let config = loaded.unwrap_or_default();

    // The server logs at its configured level, the console only warns
    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        match &cli.command {
            None | Some(Commands::Serve) => tracing::Level::from_str(&config.server.log_level)
                .unwrap_or(tracing::Level::INFO),
            Some(_) => tracing::Level::WARN,
        }
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    if !found {
        tracing::info!(
            "Config file not found, using defaults: {}",
            config_path.display()
        );
    }

    match cli.command {
        None | Some(Commands::Serve) => run_server(&config, &config_path).await?,
        Some(Commands::Show) => handle_show_command(&config, &config_path),
        Some(Commands::Token(command)) => handle_token_command(&config, &command).await?,
    }

    Ok(())
}

/// Run the API server (default mode when no subcommand is provided)
async fn run_server(config: &Config, config_path: &Path) -> Result<()> {
    let manager = config.queue.create_manager();
    let directory = Directory::from_seed().context("Failed to load hospital directory")?;

    println!("🏥 ClinicQ started");
    println!("📂 Config file: {}", config_path.display());
    println!(
        "💾 Queue storage: {} (~{} min per patient)",
        manager.store_name(),
        config.queue.minutes_per_patient
    );
    println!(
        "🌐 API available at: http://{}:{}/api",
        config.server.host, config.server.port
    );
    println!("🛑 Press Ctrl+C to stop");

    let state = AppState::new(
        share(manager),
        directory.into_shared(),
        config.admin.clone(),
    );
    WebServer::new(&config.server, state).start().await
}

/// Handle show command
fn handle_show_command(config: &Config, config_path: &Path) {
    println!("Config file: {}", config_path.display());
    if !config_path.exists() {
        println!("(file not found, showing defaults)");
    }
    println!();
    print!("{}", cli::format_config(config));
}

/// Handle token console commands
async fn handle_token_command(config: &Config, command: &TokenCommand) -> Result<()> {
    let queue = config
        .client
        .create_queue()
        .context("Failed to create queue client")?;
    cli::execute_token_command(&queue, command).await
}
