use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use userdb::config::{Config, TelemetryConfig};
use userdb::telemetry;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    dotenvy::dotenv().ok();
    let args = cli::Cli::parse();

    telemetry::init(&TelemetryConfig::from_env());

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting {}", config.telemetry.service_name);

    match cli::execute(args.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
