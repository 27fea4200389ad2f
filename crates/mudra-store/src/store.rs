//! The gesture template store

use std::collections::HashMap;

use mudra_core::{Gesture, MudraResult};

use crate::{GestureCodec, MemoryCodec};

/// Name-keyed gesture collection with a stable insertion order.
///
/// Lookup is case-sensitive and exact; name *uniqueness* is
/// case-insensitive, so `put` replaces any entry whose name differs only
/// in case, keeping the replaced entry's ordinal slot. Persistence is
/// delegated to the codec; a failed save leaves the in-memory state as
/// mutated, and callers decide whether to retry.
pub struct GestureStore {
    codec: Box<dyn GestureCodec>,
    order: Vec<String>,
    gestures: HashMap<String, Gesture>,
}

impl GestureStore {
    pub fn new(codec: Box<dyn GestureCodec>) -> Self {
        GestureStore {
            codec,
            order: Vec::new(),
            gestures: HashMap::new(),
        }
    }

    /// Store backed by an in-memory buffer (tests, demos)
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryCodec::new()))
    }

    /// Case-sensitive exact lookup
    pub fn get(&self, name: &str) -> Option<&Gesture> {
        self.gestures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.gestures.contains_key(name)
    }

    /// Insert or overwrite by name.
    ///
    /// A case-insensitive name collision replaces the colliding entry in
    /// place; otherwise the gesture is appended to the ordering.
    pub fn put(&mut self, gesture: Gesture) {
        let name = gesture.name().to_string();
        let slot = self
            .order
            .iter()
            .position(|existing| existing.eq_ignore_ascii_case(&name));

        match slot {
            Some(index) => {
                let previous = std::mem::replace(&mut self.order[index], name.clone());
                self.gestures.remove(&previous);
            }
            None => self.order.push(name.clone()),
        }
        self.gestures.insert(name, gesture);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Gesture names in ordinal order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// The gesture at an ordinal position
    pub fn at(&self, index: usize) -> Option<&Gesture> {
        self.order.get(index).and_then(|name| self.gestures.get(name))
    }

    /// Iterate gestures in ordinal order
    pub fn iter(&self) -> impl Iterator<Item = &Gesture> {
        self.order.iter().filter_map(|name| self.gestures.get(name))
    }

    /// Replace the store's contents from the codec.
    ///
    /// Missing backing storage loads as empty. The resulting order is
    /// whatever the codec yields (sorted by name for the JSON codec).
    pub fn load(&mut self) -> MudraResult<()> {
        let loaded = self.codec.load()?;
        self.order.clear();
        self.gestures.clear();
        for gesture in loaded {
            self.put(gesture);
        }
        Ok(())
    }

    /// Persist the whole collection through the codec.
    ///
    /// On failure the in-memory contents are untouched and still reflect
    /// every prior mutation; retrying or accepting the discrepancy is the
    /// caller's decision.
    pub fn save(&self) -> MudraResult<()> {
        let ordered: Vec<&Gesture> = self.iter().collect();
        self.codec.save(&ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mudra_core::Frame;

    fn gesture(name: &str) -> Gesture {
        Gesture::new(name, vec![Frame::new()]).unwrap()
    }

    #[test]
    fn test_get_is_case_sensitive() {
        let mut store = GestureStore::in_memory();
        store.put(gesture("Wave"));

        assert!(store.get("Wave").is_some());
        assert!(store.get("wave").is_none());
    }

    #[test]
    fn test_put_replaces_case_insensitively() {
        let mut store = GestureStore::in_memory();
        store.put(gesture("wave"));
        store.put(gesture("fist"));
        store.put(gesture("WAVE"));

        assert_eq!(store.len(), 2);
        assert!(store.get("wave").is_none());
        assert!(store.get("WAVE").is_some());
        // The replacement kept the original ordinal slot.
        assert_eq!(store.names(), ["WAVE".to_string(), "fist".to_string()]);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = GestureStore::in_memory();
        store.put(gesture("c"));
        store.put(gesture("a"));
        store.put(gesture("b"));

        let names: Vec<&str> = store.iter().map(|g| g.name()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let codec = MemoryCodec::new();
        let mut store = GestureStore::new(Box::new(codec.clone()));
        store.put(gesture("zeta").with_response("swap-shape"));
        store.put(gesture("alpha"));
        store.save().unwrap();

        let mut reloaded = GestureStore::new(Box::new(codec));
        reloaded.load().unwrap();
        assert_eq!(reloaded.len(), 2);
        // Codec order is lexicographic.
        assert_eq!(reloaded.names(), ["alpha".to_string(), "zeta".to_string()]);
        assert_eq!(reloaded.get("zeta").unwrap().response_name(), Some("swap-shape"));
    }

    #[test]
    fn test_load_absent_is_empty() {
        let mut store = GestureStore::in_memory();
        store.load().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let mut store = GestureStore::new(Box::new(crate::JsonFileCodec::new(
            "/nonexistent/never/gestures.json",
        )));
        store.put(gesture("wave"));

        assert!(store.save().is_err());
        assert!(store.get("wave").is_some());
    }
}
