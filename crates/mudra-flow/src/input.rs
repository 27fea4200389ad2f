//! Text input collaborator
//!
//! The naming and response-selection states block cooperatively on an
//! external text source (keyboard, voice transcription). The contract is
//! pull-based: `pending` exposes whatever input has arrived, and the
//! consumer clears it after consumption.

/// External text input feeding the naming/selection states
pub trait InputCollector {
    /// The pending input, if any. Empty means still waiting.
    fn pending(&self) -> Option<&str>;

    /// Discard the pending input after consumption
    fn clear(&mut self);
}

/// Single-slot input fed by the embedding application
#[derive(Debug, Default)]
pub struct SlotInput {
    value: Option<String>,
}

impl SlotInput {
    pub fn new() -> Self {
        SlotInput::default()
    }

    /// Supply input; replaces anything not yet consumed
    pub fn offer(&mut self, text: impl Into<String>) {
        self.value = Some(text.into());
    }
}

impl InputCollector for SlotInput {
    fn pending(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn clear(&mut self) {
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_lifecycle() {
        let mut input = SlotInput::new();
        assert!(input.pending().is_none());

        input.offer("wave");
        assert_eq!(input.pending(), Some("wave"));

        input.clear();
        assert!(input.pending().is_none());
    }
}
