//! turnero entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use turnero_core::{TracingConfig, init_tracing};
use turnero_server::cli::{Cli, Command};
use turnero_server::config::AppConfig;
use turnero_server::error::ServerResult;
use turnero_server::commands;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ServerResult<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    let mut tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::server()
    };
    if let Some(format) = config.logging.format {
        tracing_config = tracing_config.with_format(format);
    }
    init_tracing(tracing_config)?;

    match cli.command_or_default() {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            commands::serve(&config).await
        }
        Command::Auth { force } => {
            commands::auth(&config, force).await?;
            info!("token saved");
            Ok(())
        }
    }
}
