use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use datalens::cli;
use datalens::config::{AppConfig, CliArgs, Command};
use datalens::util::logging::init_tracing;
use datalens::schema::Shape;
use datalens::web;
use datalens::web::state::AppState;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = match AppConfig::new(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging
    init_tracing(&config.logging);

    match args.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => {
            let app_state = Arc::new(AppState::new(&config));

            info!("Starting datalens validation service on {}:{}", config.web.host, config.web.port);
            match web::run_server(config.web, app_state).await {
                Ok(_) => info!("Server stopped gracefully"),
                Err(e) => {
                    error!("Server error: {}", e);
                    return Err(e.into());
                }
            }
        }
        Command::Check { shape, file } => {
            let options = config.validation_options();
            let valid = cli::run_check(
                &shape,
                &file,
                &options,
                &mut std::io::stdout().lock(),
                &mut std::io::stderr().lock(),
            )
            .inspect_err(|e| error!("Check failed: {}", e))?;
            if !valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Shapes => {
            for name in Shape::names() {
                println!("{}", name);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
