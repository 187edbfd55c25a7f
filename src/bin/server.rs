//! Server binary: bind, listen, serve forever.

use passmint::config::ServerConfig;
use passmint::server::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        listen = %config.listen,
        seeded = config.seed.is_some(),
        "Starting passmint server"
    );

    let server = Server::bind(&config)?;
    server.run()?;
    Ok(())
}
