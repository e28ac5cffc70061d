use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dojoadmin::api::ApiClient;
use dojoadmin::cli::Cli;
use dojoadmin::config::Config;
use dojoadmin::events::EventBus;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dojoadmin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::debug!(backend = %config.backend_url, "Configuration loaded");

    let client = ApiClient::new(&config);
    let bus = EventBus::new();

    let cli = Cli::init();
    cli.command.run(&client, &bus).await
}
