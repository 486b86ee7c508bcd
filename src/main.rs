//! Postal-code weather services.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────┐  traceparent  ┌──────────────┐  traceparent  ┌────────────────┐
//!  POST /weather  │    front     │──────────────▶│     back     │──────────────▶│ postal-code API│
//! ───────────────▶│ validate cep │               │ validate cep │               └────────────────┘
//!                 │ relay answer │◀──────────────│ city→weather │──────────────▶┌────────────────┐
//!  ◀──────────────│              │  status+body  │ °C °F K      │               │  weather API   │
//!                 └──────┬───────┘               └──────┬───────┘               └────────────────┘
//!                        │ OTLP (batched)               │ OTLP (batched)
//!                        ▼                              ▼
//!                 ┌──────────────────────────────────────────┐
//!                 │              trace collector             │
//!                 └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use cep_weather::config::{load_config, loader::listen_address, ServiceRole};
use cep_weather::lifecycle::startup;

#[derive(Parser)]
#[command(name = "cep-weather")]
#[command(about = "Postal-code weather services with distributed tracing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate postal codes and forward them to the back service
    Front(ServiceArgs),
    /// Resolve postal codes to a city and its current temperature
    Back(ServiceArgs),
}

#[derive(Args)]
struct ServiceArgs {
    /// TOML configuration file; environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding config and HTTP_PORT
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let (role, args) = match cli.command {
        Commands::Front(args) => (ServiceRole::Front, args),
        Commands::Back(args) => (ServiceRole::Back, args),
    };

    let mut config = match load_config(args.config.as_deref(), role) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cep-weather {}: {}", role, e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(listen) = args.listen {
        config.listener.bind_address = listen_address(&listen);
    }

    match startup::run(role, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("cep-weather {}: {}", role, e);
            ExitCode::FAILURE
        }
    }
}
