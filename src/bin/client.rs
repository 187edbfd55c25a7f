//! Client binary: connect and run the interactive prompt loop.

use passmint::client::Client;
use passmint::config::ClientConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ClientConfig::load()?;

    // Diagnostics go to stderr; the prompt and passwords own stdout.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let client = Client::connect(&config)?;
    client.run()?;
    Ok(())
}
