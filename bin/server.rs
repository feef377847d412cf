// Credly Tracker - Web Server
// REST API over the badge ledger

use anyhow::{Context, Result};
use credly_tracker::api::router;
use credly_tracker::config::{init_logging, Config};
use credly_tracker::BadgeStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_logging(config.log_format);

    let store = BadgeStore::open(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;

    let app = router(store);

    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server_addr))?;

    info!(addr = %config.server_addr, db = %config.db_path.display(), "credly server listening");

    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}
