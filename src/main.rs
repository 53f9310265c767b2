//! Formula PM runtime core
//!
//! Bootstraps the platform services, serves health and monitoring endpoints,
//! and shuts everything down on Ctrl-C.

use anyhow::Context;
use clap::Parser;
use formula_core::Config;
use formula_core::server::run_server;
use formula_core::utils::logging::init_tracing;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "formula-core", version, about)]
struct Cli {
    /// YAML configuration file; defaults plus FORMULA_* variables when absent
    #[arg(short, long, env = "FORMULA_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,
}

async fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .await
            .and_then(Config::with_env_overrides)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::from_env().context("loading configuration from the environment")?,
    };

    if let Some(host) = &cli.host {
        config.app.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.app.server.port = port;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.print_config {
        return match config.to_yaml() {
            Ok(yaml) => {
                print!("{}", yaml);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    if let Err(e) = init_tracing(config.logging()) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting {} {}", formula_core::NAME, formula_core::VERSION);
    match run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting: {}", e);
            ExitCode::FAILURE
        }
    }
}
