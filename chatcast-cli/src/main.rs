use anyhow::{Context, Result};
use chatcast_core::config::Config;
use chatcast_core::http_api::{AppState, ChatServer, API_PREFIX};
use chatcast_core::logging::{init_logging_with_config, LogConfig};
use chatcast_core::metrics::init_metrics;
use chatcast_core::shutdown::{install_signal_handlers, ShutdownCoordinator};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "chatcast")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file; environment variables are used otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:3000
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// JSON file with extra channels and messages to start from
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API and event stream (default)
    Serve,

    /// Write the effective configuration to a TOML file and exit
    WriteConfig {
        /// Destination file
        path: PathBuf,
    },
}

/// Config file (or environment) with command line flags layered on top
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::from_env()?,
    };

    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(seed) = &args.seed {
        config.seed.seed_file = Some(seed.clone());
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.to_lowercase();
    }
    if args.json_logs {
        config.logging.json_format = true;
    }

    config.validate()?;
    Ok(config)
}

async fn serve(config: Config) -> Result<()> {
    init_metrics();

    let state = AppState::from_config(&config)?;
    let shutdown = Arc::new(ShutdownCoordinator::new());
    install_signal_handlers(shutdown.clone());

    info!(
        bind = %config.server.bind_address,
        prefix = API_PREFIX,
        "Chatcast starting"
    );

    ChatServer::new(
        state,
        config.server.bind_address,
        shutdown,
        config.server.shutdown_timeout,
    )
    .run()
    .await?;

    info!("Chatcast stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    init_logging_with_config(LogConfig::from_config(&config.logging)?)?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::WriteConfig { path } => {
            config.save_to_file(&path)?;
            info!(path = %path.display(), "Configuration written");
            Ok(())
        }
    }
}
