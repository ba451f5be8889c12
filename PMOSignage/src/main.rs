use axum::Json;
use axum::extract::State;
use psgagent::{ContentAnnouncement, ContentPublisher, DisplayPageExt, HeartbeatReporter, SyncLoop};
use psgcache::AssetCache;
use psgconfig::Config;
use psgkiosk::KioskLauncher;
use psgmanager::ManagerClient;
use psgserver::Server;
use std::time::Instant;
use tokio::sync::watch;
use tracing::info;

/// Latest content announcement for the display surface poller.
async fn current_announcement(
    State(announcements): State<watch::Receiver<Option<ContentAnnouncement>>>,
) -> Json<Option<ContentAnnouncement>> {
    Json(announcements.borrow().clone())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // ========== PHASE 1 : Configuration ==========

    let config = Config::from_env()?;
    let started = Instant::now();

    // ========== PHASE 2 : Components ==========

    let client = ManagerClient::builder()
        .base_url(config.base_url.clone())
        .api_key(config.api_key.clone())
        .screen_id(config.screen_id.clone())
        .build()?;

    // An uncreatable cache root is fatal: nothing can be displayed without it.
    let cache = AssetCache::new(&config.cache_dir)?;
    let kiosk = KioskLauncher::new();

    let publisher = ContentPublisher::new(kiosk.clone(), config.display_url());
    let announcements = publisher.subscribe();
    let (sync_loop, rotation) =
        SyncLoop::new(client.clone(), cache, publisher, config.poll_interval);
    let heartbeat = HeartbeatReporter::new(client, rotation, config.heartbeat_interval);

    // ========== PHASE 3 : Local HTTP surface ==========

    info!("📺 Registering display surface routes...");
    let mut server = Server::new("PMO-Signage", config.http_port);
    server.add_display_page().await;
    server.add_asset_dir("/cache", &config.cache_dir).await;
    server
        .add_handler_with_state("/api/current", current_announcement, announcements)
        .await;

    let screen_id = config.screen_id.clone();
    server
        .add_route("/api/status", move || {
            let screen_id = screen_id.clone();
            async move {
                serde_json::json!({
                    "screenId": screen_id,
                    "status": "online",
                    "uptime": started.elapsed().as_secs(),
                })
            }
        })
        .await;

    // A busy port is fatal: the display surface needs a stable address.
    server.start().await?;

    // ========== PHASE 4 : Agent tasks ==========

    info!("🔄 Starting sync and heartbeat tasks...");
    tokio::spawn(heartbeat.run());
    tokio::spawn(sync_loop.run());

    info!("✅ PMOSignage is ready!");
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    // Operator interrupt: tear down the display surface before exiting.
    kiosk.terminate().await;

    Ok(())
}
