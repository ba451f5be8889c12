//! Heartbeat reporter: periodic liveness reports to the manager

use psgmanager::{Heartbeat, ManagerClient};
use psgplaylist::PlaylistItem;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Raspberry Pi thermal zone exposing the SoC temperature
#[cfg(target_os = "linux")]
const THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";

/// CPU temperature in Celsius, when the host exposes one.
#[cfg(target_os = "linux")]
pub fn cpu_temperature() -> Option<f64> {
    let raw = std::fs::read_to_string(THERMAL_ZONE).ok()?;
    let millidegrees: f64 = raw.trim().parse().ok()?;
    Some(millidegrees / 1000.0)
}

#[cfg(not(target_os = "linux"))]
pub fn cpu_temperature() -> Option<f64> {
    None
}

/// Periodic status reporter, independent of the rotation cadence.
///
/// Reads the rotation snapshot published by the sync loop (a read-only
/// peek, so a heartbeat tick can never advance rotation) and submits an
/// online status with uptime and temperature. Submission failures are
/// logged and swallowed: the reporter loop never terminates and never
/// touches any shared state.
pub struct HeartbeatReporter {
    client: ManagerClient,
    snapshot: watch::Receiver<Option<PlaylistItem>>,
    interval: Duration,
    started_at: Instant,
}

impl HeartbeatReporter {
    pub fn new(
        client: ManagerClient,
        snapshot: watch::Receiver<Option<PlaylistItem>>,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            snapshot,
            interval,
            started_at: Instant::now(),
        }
    }

    /// Report once. Failures are logged, never propagated.
    pub async fn tick(&self) {
        let current_asset = self
            .snapshot
            .borrow()
            .as_ref()
            .map(|item| item.asset_id.clone());
        let heartbeat = Heartbeat::online(
            current_asset,
            self.started_at.elapsed().as_secs(),
            cpu_temperature(),
        );

        match self.client.send_heartbeat(&heartbeat).await {
            Ok(_) => debug!(
                asset = ?heartbeat.current_asset,
                uptime = heartbeat.uptime,
                "Heartbeat sent"
            ),
            Err(e) => warn!("Heartbeat failed: {e}"),
        }
    }

    /// Report forever on the configured interval.
    ///
    /// The first report goes out immediately, so a freshly booted screen
    /// shows up online without waiting a full interval.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psgplaylist::ContentType;

    fn unreachable_client() -> ManagerClient {
        ManagerClient::builder()
            .base_url("http://127.0.0.1:9")
            .api_key("k")
            .screen_id("tv-1")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_failure_is_swallowed() {
        let (_tx, rx) = watch::channel(None);
        let reporter = HeartbeatReporter::new(unreachable_client(), rx, Duration::from_secs(60));

        // Must neither panic nor propagate the connection error.
        reporter.tick().await;
    }

    #[tokio::test]
    async fn test_tick_reads_snapshot_without_consuming_it() {
        let item = PlaylistItem {
            asset_id: "promo-video".to_string(),
            kind: ContentType::Video,
            duration: 30,
        };
        let (tx, rx) = watch::channel(Some(item));
        let reporter = HeartbeatReporter::new(unreachable_client(), rx, Duration::from_secs(60));

        reporter.tick().await;
        reporter.tick().await;

        // The snapshot slot still holds the value the sync loop put there.
        assert_eq!(
            tx.borrow().as_ref().unwrap().asset_id,
            "promo-video"
        );
    }
}
