//! pourboard server binary.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from the environment
//! 3. Connect to the item store (fatal on failure)
//! 4. Seed an empty store or backfill legacy rows
//! 5. Serve REST + `WebSocket` until `Ctrl-C`

use pourboard_server::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the store connection, or the
/// server fails; the process then exits non-zero.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("pourboard starting");

    let config = ServerConfig::from_env()?;
    info!(
        host = config.host,
        port = config.port,
        store = ?config.store,
        database = config.database_name,
        "Configuration loaded"
    );

    pourboard_server::run(config).await?;
    Ok(())
}
