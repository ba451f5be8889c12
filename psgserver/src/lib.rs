//! # psgserver - Local HTTP surface for PMOSignage
//!
//! Thin wrapper around Axum used by the agent to expose its
//! announcement endpoint, the cached asset files and the embedded
//! display page on a single local port.
//!
//! ## Example
//!
//! ```rust,no_run
//! use psgserver::Server;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = Server::new("PMO-Signage", 8080);
//!
//!     server.add_route("/api/status", || async {
//!         serde_json::json!({ "status": "online" })
//!     }).await;
//!     server.add_asset_dir("/cache", Path::new("/var/cache/signage")).await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

mod server;

pub use server::Server;
