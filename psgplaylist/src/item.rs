//! Playlist item types as serialized by the signage manager

use serde::{Deserialize, Serialize};

/// Kind of media a playlist item points at.
///
/// The manager only schedules images and videos; anything else is
/// rejected at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Image,
    Video,
}

/// One timed entry of a screen's playlist.
///
/// Items are owned by the [`PlaylistStore`](crate::PlaylistStore) as an
/// ordered sequence and are never mutated in place: a remote update
/// replaces the whole sequence. Equality is structural, which is what
/// makes change detection across polls work, since every poll deserializes a
/// fresh object graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    /// Asset identifier, resolved to a URL and filename on demand
    pub asset_id: String,
    /// Media kind (`type` on the wire)
    #[serde(rename = "type")]
    pub kind: ContentType,
    /// How long the item stays on screen, in seconds
    pub duration: u64,
}
