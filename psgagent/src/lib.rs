//! # psgagent - Composition layer of the PMOSignage display agent
//!
//! Glues the building blocks into the three long-running concerns of
//! the agent:
//!
//! - [`SyncLoop`]: the single writer. Polls the manager on the outer
//!   cadence, reconciles the playlist, materializes assets in the
//!   background and advances rotation on one-second inner ticks.
//! - [`ContentPublisher`]: single-slot publication of the current
//!   [`ContentAnnouncement`], plus the one-time display-surface start.
//! - [`HeartbeatReporter`]: independent liveness reports built from a
//!   read-only rotation snapshot.
//!
//! The three tasks never block each other: all shared state crosses
//! task boundaries as immutable snapshots through `watch` slots.
//!
//! ## Wiring
//!
//! ```no_run
//! use psgagent::{ContentPublisher, DisplayPageExt, HeartbeatReporter, SyncLoop};
//! use psgcache::AssetCache;
//! use psgkiosk::KioskLauncher;
//! use psgmanager::ManagerClient;
//! use psgserver::Server;
//! use std::path::Path;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ManagerClient::builder()
//!         .api_key("secret")
//!         .screen_id("tv-1")
//!         .build()?;
//!     let cache = AssetCache::new(Path::new("/var/cache/signage"))?;
//!     let kiosk = KioskLauncher::new();
//!
//!     let publisher = ContentPublisher::new(kiosk.clone(), "http://127.0.0.1:8080/");
//!     let announcements = publisher.subscribe();
//!     let (sync_loop, rotation) =
//!         SyncLoop::new(client.clone(), cache, publisher, Duration::from_secs(30));
//!     let heartbeat = HeartbeatReporter::new(client, rotation, Duration::from_secs(60));
//!
//!     let mut server = Server::new("PMO-Signage", 8080);
//!     server.add_display_page().await;
//!     // ... announcement + cache routes, then start() / wait()
//!
//!     tokio::spawn(heartbeat.run());
//!     tokio::spawn(sync_loop.run());
//!     # let _ = announcements;
//!     Ok(())
//! }
//! ```

mod display;
mod heartbeat;
mod publisher;
mod sync;

pub use display::{DisplayPage, DisplayPageExt};
pub use heartbeat::{cpu_temperature, HeartbeatReporter};
pub use publisher::{ContentAnnouncement, ContentPublisher};
pub use sync::SyncLoop;
