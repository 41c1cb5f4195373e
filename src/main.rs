//! GateRelay service entrypoint.
//!
//! Flow: parse flags → load config → init logging → start relay →
//! wait for SIGINT/SIGTERM → graceful shutdown.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use gaterelay::config::load_config;
use gaterelay::lifecycle::signals::wait_for_shutdown_signal;
use gaterelay::observability::logging::init_logging;
use gaterelay::Relay;

#[derive(Parser)]
#[command(name = "gaterelay", version)]
#[command(about = "Transparent TCP relay with connection limits and graceful shutdown")]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "/etc/gaterelay/config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "starting gaterelay"
    );

    let grace = config.shutdown_grace();
    let relay = Relay::new(config);

    if let Err(e) = relay.start().await {
        tracing::error!(error = %e, "failed to start relay");
        return ExitCode::FAILURE;
    }

    match wait_for_shutdown_signal().await {
        Ok(signal) => tracing::info!(signal, "received shutdown signal"),
        Err(e) => tracing::error!(error = %e, "signal handler failed, shutting down"),
    }

    relay.shutdown(grace).await;

    tracing::info!("gaterelay stopped");
    ExitCode::SUCCESS
}
