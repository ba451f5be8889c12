//! # psgplaylist - Playlist state and rotation for PMOSignage
//!
//! This crate holds the agent-side model of a screen's playlist:
//!
//! - [`PlaylistItem`] / [`ContentType`]: the timed content items as the
//!   manager serializes them
//! - [`PlaylistStore`]: the locally held ordered sequence, replaced
//!   wholesale when a poll detects a structural change
//! - [`RotationState`]: which item is current and since when
//!
//! The crate is pure state logic: no I/O, no clocks of its own. Every
//! operation that depends on time takes `now` as an argument, so callers
//! decide the cadence and tests inject arbitrary instants.
//!
//! # Example
//!
//! ```
//! use psgplaylist::{ContentType, PlaylistItem, PlaylistStore};
//! use std::time::{Duration, Instant};
//!
//! let start = Instant::now();
//! let mut store = PlaylistStore::new(start);
//!
//! let items = vec![PlaylistItem {
//!     asset_id: "welcome-img".to_string(),
//!     kind: ContentType::Image,
//!     duration: 10,
//! }];
//!
//! assert!(store.sync(items.clone(), start));
//! assert_eq!(store.current_item(start), Some(&items[0]));
//!
//! // The same content fetched again is not a change.
//! assert!(!store.sync(items, start + Duration::from_secs(3)));
//! ```

mod item;
mod rotation;
mod store;

pub use item::{ContentType, PlaylistItem};
pub use rotation::RotationState;
pub use store::PlaylistStore;
