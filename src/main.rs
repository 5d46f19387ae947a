use agent_feed_sdk::feed::{FeedConfig, FeedService};
use agent_feed_sdk::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging()?;

    // Window label from the command line, defaulting to the last 24 hours
    let window_label = std::env::args().nth(1).unwrap_or_else(|| "24h".to_string());

    let config = FeedConfig::from_env()?.with_cache_dir("feed-cache");
    let service = FeedService::new(config);

    tracing::info!("Fetching activity feed for window {}", window_label);
    let view = service.conversations(&window_label).await?;

    let (clients, services, brokers, unclassified) = view.role_counts();
    tracing::info!(
        "{} window: {} entries ({} client, {} service, {} broker, {} unclassified)",
        view.window_label,
        view.len(),
        clients,
        services,
        brokers,
        unclassified
    );
    tracing::info!("Cache status: {:?}", service.cache_status());

    Ok(())
}
