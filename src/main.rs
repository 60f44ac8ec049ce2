//! Realty API Server Entry Point

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use realty::{run_http, ApiState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// Realty: natural-language questions over real-estate market data
#[derive(Parser, Debug)]
#[command(name = "realty")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default behavior)
    Serve {
        /// HTTP port. If not specified, uses config file value.
        #[arg(short, long)]
        port: Option<u16>,
        /// Dataset file. If not specified, uses config file value.
        #[arg(short, long)]
        data: Option<String>,
        /// Enable JSON logging format
        #[arg(long)]
        json_logs: bool,
    },
    /// Answer a question against the dataset
    Ask {
        /// Question text
        message: String,
    },
    /// List the localities in the dataset
    Locations,
    /// Export one locality's rows as CSV
    Export {
        /// Locality name (case-insensitive)
        area: String,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let is_serve = matches!(args.command, Some(Command::Serve { .. }) | None);

    if !is_serve {
        // Minimal logging for CLI commands
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let config = load_config(&args.config)?;

    match args.command {
        Some(Command::Ask { message }) => cli::run_ask(config, message, args.json).await,
        Some(Command::Locations) => cli::run_locations(config, args.json).await,
        Some(Command::Export { area, output }) => {
            cli::run_export(config, area, output, args.json).await
        }
        Some(Command::Serve {
            port,
            data,
            json_logs,
        }) => run_server(config, port, data, json_logs).await,
        None => run_server(config, None, None, false).await,
    }
}

fn load_config(path: &Option<String>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Run the HTTP API.
async fn run_server(
    mut config: Config,
    port: Option<u16>,
    data: Option<String>,
    json_logs: bool,
) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Realty API v{}", env!("CARGO_PKG_VERSION"));

    // CLI overrides
    if let Some(port) = port {
        config.server.http_port = port;
    }
    if let Some(data) = data {
        config.dataset.path = data;
    }
    config.validate()?;

    tracing::info!(
        dataset = %config.dataset.resolved_path().display(),
        "Using dataset"
    );

    let state = Arc::new(ApiState::from_config(&config));
    cli::warm_cache(&state).await;

    run_http(state, &config.server).await
}
