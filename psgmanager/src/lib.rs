//! # psgmanager - Signage manager API client
//!
//! Rust client for the central signage manager consumed by the display
//! agent. Three operations, all authenticated with an `x-api-key`
//! header and bounded by explicit timeouts:
//!
//! - `GET /api/screens/{screenId}/playlist`: the ordered item sequence
//! - `GET /api/assets/{assetId}`: download URL + filename for an asset
//! - `POST /api/screens/{screenId}/heartbeat`: liveness/status report
//!
//! Failures are typed but uniformly soft: the agent logs them and keeps
//! running on whatever state it already has.

mod client;
mod error;
mod models;

pub use client::{
    ClientBuilder, ManagerClient, API_KEY_HEADER, DEFAULT_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
pub use error::{Error, Result};
pub use models::{AssetInfo, Heartbeat, HeartbeatAck, PlaylistResponse};
