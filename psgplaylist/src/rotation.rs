//! Rotation state: which playlist slot is current and since when

use crate::item::PlaylistItem;
use std::time::{Duration, Instant};

/// Position of the rotation through the playlist.
///
/// Invariant: `current_index < items.len()` whenever the playlist is
/// non-empty. The store enforces this by resetting the state to
/// `(0, now)` on every structural playlist change, so an index computed
/// against one sequence is never applied to another.
#[derive(Debug, Clone, Copy)]
pub struct RotationState {
    current_index: usize,
    item_started: Instant,
}

impl RotationState {
    /// Fresh state pointing at the first slot as of `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            current_index: 0,
            item_started: now,
        }
    }

    /// Index of the slot currently on screen.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// When the current slot started.
    pub fn item_started(&self) -> Instant {
        self.item_started
    }

    /// Advance to the next slot if the current one has run its duration.
    ///
    /// Advances at most one slot per call, however far past the deadline
    /// `now` is: a stalled caller under-advances instead of skipping
    /// ahead, and rotation speed stays bounded by the call frequency.
    /// Wraparound is modulo the playlist length, so the cycle replays
    /// forever. Returns the (possibly new) current index, or `None` for
    /// an empty playlist.
    ///
    /// Callers poll this at sub-second frequency; apart from the single
    /// described state transition it has no side effects.
    pub fn advance_if_due(&mut self, items: &[PlaylistItem], now: Instant) -> Option<usize> {
        if items.is_empty() {
            return None;
        }

        let elapsed = now.duration_since(self.item_started);
        let duration = Duration::from_secs(items[self.current_index].duration);
        if elapsed >= duration {
            self.current_index = (self.current_index + 1) % items.len();
            self.item_started = now;
        }

        Some(self.current_index)
    }
}
