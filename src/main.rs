//! Postify Server
//!
//! Main entry point: loads configuration, initializes logging and starts
//! the HTTP + WebSocket server.

use tracing_subscriber::{EnvFilter, fmt};

use postify_core::config::AppConfig;
use postify_core::config::logging::LoggingConfig;

#[tokio::main]
async fn main() {
    let env = std::env::var("POSTIFY_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);
    tracing::info!(env = %env, "Starting Postify v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = postify_api::run_server(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing. `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
