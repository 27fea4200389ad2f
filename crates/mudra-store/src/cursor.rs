//! Ordinal navigation over the store

use tracing::warn;

use mudra_core::Gesture;

use crate::GestureStore;

/// Cycling cursor over the store's current name ordering.
///
/// Wraps at both ends. The cursor holds only an index, so it stays valid
/// as the store changes; the index is re-clamped against the current
/// length on every move.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureCursor {
    index: usize,
}

impl GestureCursor {
    pub fn new() -> Self {
        GestureCursor::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The gesture currently under the cursor
    pub fn current<'a>(&self, store: &'a GestureStore) -> Option<&'a Gesture> {
        if store.is_empty() {
            return None;
        }
        store.at(self.index % store.len())
    }

    /// Advance to the next gesture, wrapping past the end.
    ///
    /// Warns and leaves the index unchanged when the store is empty.
    pub fn next<'a>(&mut self, store: &'a GestureStore) -> Option<&'a Gesture> {
        if store.is_empty() {
            warn!("no stored gestures to select");
            return None;
        }
        self.index = (self.index + 1) % store.len();
        store.at(self.index)
    }

    /// Step back to the previous gesture, wrapping past the start.
    ///
    /// Warns and leaves the index unchanged when the store is empty.
    pub fn previous<'a>(&mut self, store: &'a GestureStore) -> Option<&'a Gesture> {
        if store.is_empty() {
            warn!("no stored gestures to select");
            return None;
        }
        let len = store.len();
        self.index = (self.index % len + len - 1) % len;
        store.at(self.index)
    }
}
