//! PlaylistStore: the locally held playlist and its rotation

use crate::item::PlaylistItem;
use crate::rotation::RotationState;
use std::time::Instant;
use tracing::info;

/// The agent's copy of the remote playlist, plus rotation position.
///
/// The store is owned by a single writer (the sync loop); readers get
/// cloned snapshots through channels rather than references into the
/// store. Remote updates replace the held sequence wholesale; items are
/// never mutated in place.
///
/// Change detection is structural: two sequences with identical items in
/// identical order are the same playlist, regardless of the fact that
/// every poll deserializes fresh instances. This is what keeps rotation
/// running smoothly across polls that return unchanged content.
pub struct PlaylistStore {
    items: Vec<PlaylistItem>,
    rotation: RotationState,
}

impl PlaylistStore {
    /// Empty store; rotation idle until the first playlist arrives.
    pub fn new(now: Instant) -> Self {
        Self {
            items: Vec::new(),
            rotation: RotationState::new(now),
        }
    }

    /// Reconcile a freshly fetched playlist against the held one.
    ///
    /// Returns `true` and resets rotation to `(0, now)` when the new
    /// sequence differs structurally; returns `false` and leaves
    /// everything untouched when it is equal. Fetch failures never reach
    /// this method: the caller simply skips the call, so the stale
    /// playlist keeps playing.
    pub fn sync(&mut self, remote: Vec<PlaylistItem>, now: Instant) -> bool {
        if remote == self.items {
            return false;
        }

        info!(
            old_len = self.items.len(),
            new_len = remote.len(),
            "Playlist updated"
        );
        self.items = remote;
        self.rotation = RotationState::new(now);
        true
    }

    /// The item that should be on screen as of `now`, advancing the
    /// rotation first when the current slot has run its duration.
    ///
    /// This is the single advancing entry point; it belongs to the sync
    /// loop. Status paths use [`peek`](Self::peek) instead.
    pub fn current_item(&mut self, now: Instant) -> Option<&PlaylistItem> {
        let index = self.rotation.advance_if_due(&self.items, now)?;
        self.items.get(index)
    }

    /// Read-only view of the current item; never advances rotation.
    pub fn peek(&self) -> Option<&PlaylistItem> {
        self.items.get(self.rotation.current_index())
    }

    /// The held sequence, in play order.
    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current rotation position (index and slot start).
    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ContentType;
    use std::time::Duration;

    fn item(id: &str, kind: ContentType, duration: u64) -> PlaylistItem {
        PlaylistItem {
            asset_id: id.to_string(),
            kind,
            duration,
        }
    }

    fn image(id: &str, duration: u64) -> PlaylistItem {
        item(id, ContentType::Image, duration)
    }

    #[test]
    fn test_identical_polls_never_reset_rotation() {
        let start = Instant::now();
        let mut store = PlaylistStore::new(start);
        let items = vec![image("a", 5), image("b", 5)];

        assert!(store.sync(items.clone(), start));

        // Advance into the second slot.
        let t = start + Duration::from_secs(6);
        assert_eq!(store.current_item(t).unwrap().asset_id, "b");
        let index_before = store.rotation().current_index();
        let started_before = store.rotation().item_started();

        // Re-sync with structurally identical content, as every poll does.
        let refetched: Vec<PlaylistItem> = serde_json::from_str(
            &serde_json::to_string(&items).unwrap(),
        )
        .unwrap();
        assert!(!store.sync(refetched, t + Duration::from_secs(1)));

        assert_eq!(store.rotation().current_index(), index_before);
        assert_eq!(store.rotation().item_started(), started_before);
    }

    #[test]
    fn test_reorder_is_a_change() {
        let start = Instant::now();
        let mut store = PlaylistStore::new(start);
        assert!(store.sync(vec![image("a", 5), image("b", 5)], start));

        let t = start + Duration::from_secs(7);
        store.current_item(t);
        assert_eq!(store.rotation().current_index(), 1);

        // Same items, different order: detected, rotation reset.
        let reset_at = start + Duration::from_secs(8);
        assert!(store.sync(vec![image("b", 5), image("a", 5)], reset_at));
        assert_eq!(store.rotation().current_index(), 0);
        assert_eq!(store.rotation().item_started(), reset_at);
    }

    #[test]
    fn test_duration_change_is_a_change() {
        let start = Instant::now();
        let mut store = PlaylistStore::new(start);
        assert!(store.sync(vec![image("a", 5)], start));
        assert!(store.sync(vec![image("a", 6)], start));
    }

    #[test]
    fn test_empty_playlist_goes_idle() {
        let start = Instant::now();
        let mut store = PlaylistStore::new(start);
        assert!(store.sync(vec![image("a", 5)], start));
        assert!(store.sync(Vec::new(), start + Duration::from_secs(1)));

        assert!(store.is_empty());
        assert_eq!(store.current_item(start + Duration::from_secs(2)), None);
        assert_eq!(store.peek(), None);
    }

    #[test]
    fn test_peek_never_advances() {
        let start = Instant::now();
        let mut store = PlaylistStore::new(start);
        store.sync(vec![image("a", 5), image("b", 5)], start);

        // However often it is called, peek reports slot 0 untouched.
        assert_eq!(store.peek().unwrap().asset_id, "a");
        assert_eq!(store.peek().unwrap().asset_id, "a");
        assert_eq!(store.rotation().current_index(), 0);

        // Only the advancing call moves the rotation.
        let t = start + Duration::from_secs(6);
        assert_eq!(store.current_item(t).unwrap().asset_id, "b");
        assert_eq!(store.peek().unwrap().asset_id, "b");
    }

    #[test]
    fn test_end_to_end_rotation_scenario() {
        // Empty playlist, then a poll returns [image 5s, video 8s].
        let start = Instant::now();
        let mut store = PlaylistStore::new(start);
        assert_eq!(store.current_item(start), None);

        let items = vec![image("img", 5), item("vid", ContentType::Video, 8)];
        assert!(store.sync(items, start));

        // Immediately after the change: item 0.
        assert_eq!(store.current_item(start).unwrap().asset_id, "img");

        // After 6s elapsed: item 1.
        let t1 = start + Duration::from_secs(6);
        assert_eq!(store.current_item(t1).unwrap().asset_id, "vid");

        // After another 9s: the 8s video is done, wraps back to item 0.
        let t2 = t1 + Duration::from_secs(9);
        assert_eq!(store.current_item(t2).unwrap().asset_id, "img");
    }
}
