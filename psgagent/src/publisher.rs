//! Content publisher: the single current-content record

use psgkiosk::KioskLauncher;
use psgplaylist::ContentType;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

/// The record the display surface polls and renders.
///
/// Overwritten wholesale on each rotation change; readers always see
/// only the most recent value; there is no queue and no history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnnouncement {
    pub asset_id: String,
    pub filename: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    /// Local HTTP path the display surface loads the media from
    pub serving_path: String,
}

/// Single-writer publisher of the current announcement.
///
/// Built on a `watch` slot: the sync loop overwrites, any number of
/// readers (the HTTP surface, tests) borrow the latest value, and
/// neither side ever blocks the other.
///
/// The first announcement additionally starts the display surface at
/// the configured local address: exactly once per process lifetime,
/// however many announcements follow, and even if that one launch
/// attempt fails (degraded mode is not retried).
pub struct ContentPublisher {
    tx: watch::Sender<Option<ContentAnnouncement>>,
    kiosk: KioskLauncher,
    display_url: String,
    display_started: bool,
}

impl ContentPublisher {
    pub fn new(kiosk: KioskLauncher, display_url: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            tx,
            kiosk,
            display_url: display_url.into(),
            display_started: false,
        }
    }

    /// Replace the current announcement.
    pub async fn announce(&mut self, announcement: ContentAnnouncement) {
        info!(
            asset = %announcement.asset_id,
            file = %announcement.filename,
            "Now showing"
        );
        self.tx.send_replace(Some(announcement));

        if !self.display_started {
            self.display_started = true;
            if let Err(e) = self.kiosk.launch(&self.display_url).await {
                warn!("Display surface unavailable, continuing headless: {e}");
            }
        }
    }

    /// Latest announcement, if any content was ever published.
    pub fn current(&self) -> Option<ContentAnnouncement> {
        self.tx.borrow().clone()
    }

    /// Hand out a reader for the HTTP surface.
    pub fn subscribe(&self) -> watch::Receiver<Option<ContentAnnouncement>> {
        self.tx.subscribe()
    }

    /// Whether the one-time display start was already triggered.
    pub fn display_started(&self) -> bool {
        self.display_started
    }
}
