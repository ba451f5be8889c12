//! Sync loop: the top-level driver of playlist, rotation and publishing
//!
//! One task owns all mutable rotation state. On the outer cadence (the
//! configured poll interval) it reconciles the remote playlist; on the
//! inner cadence (one second) it advances rotation and republishes. The
//! inner/outer ratio is fixed: `poll_interval` seconds of one-second
//! rotation checks per playlist poll.
//!
//! Cross-task visibility goes through two single-slot channels: the
//! rotation snapshot (read by the heartbeat reporter) and the content
//! announcement (read by the HTTP surface). Nothing here ever blocks on
//! a reader.

use crate::publisher::{ContentAnnouncement, ContentPublisher};
use psgcache::AssetCache;
use psgmanager::{AssetInfo, ManagerClient};
use psgplaylist::{PlaylistItem, PlaylistStore};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Inner cadence of rotation checks (seconds)
const ROTATION_TICK_SECS: u64 = 1;

/// Pause after a failed poll before the loop resumes
const ERROR_COOLDOWN_SECS: u64 = 5;

/// Resolved asset metadata, keyed by asset id.
///
/// Filled by materialization, read at announce time. Std `RwLock` is
/// enough: writes are rare and the lock is never held across an await.
type AssetMap = Arc<RwLock<HashMap<String, AssetInfo>>>;

/// The agent's main driver task.
pub struct SyncLoop {
    client: ManagerClient,
    cache: AssetCache,
    publisher: ContentPublisher,
    store: PlaylistStore,
    assets: AssetMap,
    snapshot_tx: watch::Sender<Option<PlaylistItem>>,
    last_announced: Option<String>,
    ticks_per_poll: u64,
}

impl SyncLoop {
    /// Build the loop and hand back the rotation-snapshot reader the
    /// heartbeat reporter subscribes to.
    pub fn new(
        client: ManagerClient,
        cache: AssetCache,
        publisher: ContentPublisher,
        poll_interval: Duration,
    ) -> (Self, watch::Receiver<Option<PlaylistItem>>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(None);
        let sync_loop = Self {
            client,
            cache,
            publisher,
            store: PlaylistStore::new(Instant::now()),
            assets: Arc::new(RwLock::new(HashMap::new())),
            snapshot_tx,
            last_announced: None,
            ticks_per_poll: poll_interval.as_secs().max(1) / ROTATION_TICK_SECS,
        };
        (sync_loop, snapshot_rx)
    }

    /// Run forever: poll, then rotate until the next poll is due.
    ///
    /// A failed poll is logged and followed by a short cooldown; the
    /// loop itself only ends with the process.
    pub async fn run(mut self) {
        info!(screen = %self.client.screen_id(), "Sync loop started");

        // Initial fetch so the screen lights up before the first outer tick.
        if let Err(e) = self.refresh_playlist().await {
            warn!("Initial playlist fetch failed: {e}");
        }

        let mut ticker = tokio::time::interval(Duration::from_secs(ROTATION_TICK_SECS));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            for _ in 0..self.ticks_per_poll {
                ticker.tick().await;
                self.rotation_tick().await;
            }
            if let Err(e) = self.refresh_playlist().await {
                warn!("Playlist poll failed: {e}");
                tokio::time::sleep(Duration::from_secs(ERROR_COOLDOWN_SECS)).await;
            }
        }
    }

    /// Outer cadence: fetch the remote playlist and reconcile.
    ///
    /// On a structural change the store is swapped and rotation reset
    /// before anything else can observe the new sequence; asset
    /// materialization then runs in the background so a slow download
    /// never stalls rotation over the already-cached items.
    async fn refresh_playlist(&mut self) -> psgmanager::Result<()> {
        let items = self.client.playlist().await?;
        if self.store.sync(items, Instant::now()) {
            self.snapshot_tx.send_replace(self.store.peek().cloned());
            tokio::spawn(Self::materialize(
                self.client.clone(),
                self.cache.clone(),
                self.assets.clone(),
                self.store.items().to_vec(),
            ));
        }
        Ok(())
    }

    /// Resolve and download every asset of a fresh playlist.
    ///
    /// Failures are per-item: an asset that cannot be resolved or
    /// downloaded stays scheduled and simply is not rendered until a
    /// later playlist change gives it another chance.
    async fn materialize(
        client: ManagerClient,
        cache: AssetCache,
        assets: AssetMap,
        items: Vec<PlaylistItem>,
    ) {
        for item in items {
            let info = match client.asset_info(&item.asset_id).await {
                Ok(info) => info,
                Err(e) => {
                    warn!(asset = %item.asset_id, "Asset info fetch failed: {e}");
                    continue;
                }
            };

            if let Err(e) = cache
                .ensure(&info.asset_id, &info.url, &info.filename)
                .await
            {
                warn!(asset = %item.asset_id, "Asset download failed: {e}");
            }

            // Remember the resolution either way: the filename may already
            // be cached from an earlier playlist even when this download
            // failed.
            assets
                .write()
                .unwrap()
                .insert(item.asset_id.clone(), info);
        }
    }

    /// Inner cadence: advance rotation and publish.
    ///
    /// The advancing call lives here and only here. When the active
    /// asset differs from the last one announced, its cache path is
    /// resolved and the announcement replaced; a slot whose asset is not
    /// materialized is skipped without advancing faster.
    async fn rotation_tick(&mut self) {
        let current = self.store.current_item(Instant::now()).cloned();
        self.snapshot_tx.send_replace(current.clone());

        let Some(item) = current else {
            return;
        };
        if self.last_announced.as_deref() == Some(item.asset_id.as_str()) {
            return;
        }

        let info = match self.assets.read().unwrap().get(&item.asset_id) {
            Some(info) => info.clone(),
            None => {
                debug!(asset = %item.asset_id, "Asset not resolved yet, slot not rendered");
                return;
            }
        };

        if self.cache.lookup(&info.filename).is_none() {
            debug!(
                asset = %item.asset_id,
                file = %info.filename,
                "Asset not cached, slot not rendered"
            );
            return;
        }

        self.publisher
            .announce(ContentAnnouncement {
                asset_id: info.asset_id.clone(),
                filename: info.filename.clone(),
                kind: item.kind,
                serving_path: format!("/cache/{}", info.filename),
            })
            .await;
        self.last_announced = Some(item.asset_id);
    }
}
