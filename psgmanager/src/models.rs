//! Wire types of the signage manager API

use psgplaylist::PlaylistItem;
use serde::{Deserialize, Serialize};

/// Envelope of `GET /api/screens/{screenId}/playlist`.
///
/// The manager also sends `screenId` and `lastUpdated`; the agent only
/// consumes the ordered `items` sequence and tolerates the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistResponse {
    pub items: Vec<PlaylistItem>,
}

/// Response of `GET /api/assets/{assetId}`.
///
/// Fetched lazily per playlist item and not persisted beyond the cache
/// operation it feeds. `url` may be server-relative; the client resolves
/// it against the manager base URL before handing it out.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    pub asset_id: String,
    pub url: String,
    pub filename: String,
}

/// Status payload of `POST /api/screens/{screenId}/heartbeat`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heartbeat {
    /// Always `"online"`: a screen that can speak is a screen that is up
    pub status: String,
    /// Asset currently on screen, if rotation is active
    pub current_asset: Option<String>,
    /// Seconds since the agent started
    pub uptime: u64,
    /// CPU temperature in Celsius, when the host exposes one
    pub temperature: Option<f64>,
}

impl Heartbeat {
    /// Online heartbeat for the given rotation snapshot.
    pub fn online(current_asset: Option<String>, uptime: u64, temperature: Option<f64>) -> Self {
        Self {
            status: "online".to_string(),
            current_asset,
            uptime,
            temperature,
        }
    }
}

/// Acknowledgement returned by the heartbeat endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeartbeatAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
