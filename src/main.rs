use kaigi::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting kaigi");

    // Load configuration
    let config = startup::load_config()?;

    // Start the webhook server
    startup::start_server(config).await
}
