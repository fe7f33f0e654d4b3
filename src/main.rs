use aiping_plugin::config::PluginConfig;
use aiping_plugin::providers::catalog::{CatalogFetcher, CatalogSynchronizer, SyncOutcome};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match PluginConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            warn!("[Config] {}; using defaults", e);
            PluginConfig::default()
        }
    };

    info!(
        "[Sync] Updating model manifests from {} into {}",
        config.endpoint_url,
        config.plugin_root.display()
    );

    let synchronizer = CatalogSynchronizer::new(
        CatalogFetcher::new(config.request_timeout),
        config.plugin_root.clone(),
    );

    match synchronizer.sync(&config.endpoint_url).await {
        Ok(SyncOutcome::Completed(summary)) => {
            info!("[Sync] Done: {} unique models", summary.unique());
        }
        Ok(SyncOutcome::Skipped) => {}
        Err(e) => error!("[Sync] Failed to write manifests: {}", e),
    }
}
