//! The cooperative state scheduler
//!
//! Exactly one state is current. Advancing it is a two-phase sequence:
//! `on_start` runs first and never transitions; `on_end` runs once the
//! start phase completes and decides the next state. Either phase may
//! yield (`Pending`) any number of ticks, which is how states block on
//! input, timers, or recording progress without ever leaving the single
//! scheduler thread.

use tracing::debug;

use mudra_core::SessionTime;

use crate::FlowContext;

/// Result of one phase step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Yield; run this phase again next tick
    Pending,
    /// This phase is finished
    Complete,
}

/// Result of one end-phase step
pub enum Verdict {
    /// Yield; run the end phase again next tick
    Pending,
    /// Transition to the given state
    Next(Box<dyn FlowState>),
}

/// A workflow state
pub trait FlowState {
    fn name(&self) -> &'static str;

    /// Entry phase. Never transitions.
    fn on_start(&mut self, _ctx: &mut FlowContext, _now: SessionTime) -> Phase {
        Phase::Complete
    }

    /// Main phase. Determines the transition to the next state.
    fn on_end(&mut self, ctx: &mut FlowContext, now: SessionTime) -> Verdict;
}

/// Single-threaded tick scheduler over one current state
pub struct Scheduler {
    current: Box<dyn FlowState>,
    starting: bool,
    ticks: u64,
}

impl Scheduler {
    pub fn new(initial: Box<dyn FlowState>) -> Self {
        Scheduler {
            current: initial,
            starting: true,
            ticks: 0,
        }
    }

    /// Name of the current state
    pub fn state_name(&self) -> &'static str {
        self.current.name()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance the current state by one phase step.
    ///
    /// Start-phase completion and the first end-phase step happen on
    /// separate ticks; that boundary is a yield point like any other.
    pub fn tick(&mut self, ctx: &mut FlowContext, now: SessionTime) {
        self.ticks += 1;

        if self.starting {
            if self.current.on_start(ctx, now) == Phase::Complete {
                self.starting = false;
            }
            return;
        }

        if let Verdict::Next(next) = self.current.on_end(ctx, now) {
            debug!(from = self.current.name(), to = next.name(), "state transition");
            self.current = next;
            self.starting = true;
        }
    }

    /// Replace the current state wholesale, abandoning it mid-phase.
    ///
    /// No rollback happens beyond whatever the abandoned state already
    /// did before its last yield.
    pub fn replace(&mut self, state: Box<dyn FlowState>) {
        debug!(from = self.current.name(), to = state.name(), "state replaced");
        self.current = state;
        self.starting = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mudra_match::Recognizer;
    use mudra_store::GestureStore;

    use crate::{ResponseDispatcher, ResponseRegistry, SlotInput};

    struct NullSource;
    impl mudra_record::PoseSource for NullSource {
        fn current_frame(&mut self) -> mudra_core::Frame {
            mudra_core::Frame::new()
        }
        fn hand_root_pose(&mut self) -> mudra_core::BonePose {
            mudra_core::BonePose::default()
        }
    }

    fn context() -> FlowContext {
        FlowContext::new(
            GestureStore::in_memory(),
            Recognizer::new(),
            ResponseDispatcher::new(ResponseRegistry::new()),
            Box::new(NullSource),
            Box::new(SlotInput::new()),
        )
    }

    /// Start yields `start_ticks` times, then end yields `end_ticks`
    /// times, then transitions to a terminal state.
    struct Staged {
        start_ticks: u32,
        end_ticks: u32,
    }

    struct Terminal;
    impl FlowState for Terminal {
        fn name(&self) -> &'static str {
            "terminal"
        }
        fn on_end(&mut self, _ctx: &mut FlowContext, _now: SessionTime) -> Verdict {
            Verdict::Pending
        }
    }

    impl FlowState for Staged {
        fn name(&self) -> &'static str {
            "staged"
        }

        fn on_start(&mut self, _ctx: &mut FlowContext, _now: SessionTime) -> Phase {
            if self.start_ticks > 0 {
                self.start_ticks -= 1;
                Phase::Pending
            } else {
                Phase::Complete
            }
        }

        fn on_end(&mut self, _ctx: &mut FlowContext, _now: SessionTime) -> Verdict {
            if self.end_ticks > 0 {
                self.end_ticks -= 1;
                Verdict::Pending
            } else {
                Verdict::Next(Box::new(Terminal))
            }
        }
    }

    #[test]
    fn test_two_phase_sequencing() {
        let mut scheduler = Scheduler::new(Box::new(Staged {
            start_ticks: 2,
            end_ticks: 3,
        }));
        let mut ctx = context();

        // 2 pending starts + 1 completing start + 3 pending ends +
        // 1 transitioning end = 7 ticks in "staged".
        for _ in 0..7 {
            assert_eq!(scheduler.state_name(), "staged");
            scheduler.tick(&mut ctx, SessionTime::ZERO);
        }
        assert_eq!(scheduler.state_name(), "terminal");
        assert_eq!(scheduler.ticks(), 7);
    }

    #[test]
    fn test_replace_abandons_mid_phase() {
        let mut scheduler = Scheduler::new(Box::new(Staged {
            start_ticks: 0,
            end_ticks: 100,
        }));
        let mut ctx = context();

        scheduler.tick(&mut ctx, SessionTime::ZERO); // start completes
        scheduler.tick(&mut ctx, SessionTime::ZERO); // end pending
        assert_eq!(scheduler.state_name(), "staged");

        scheduler.replace(Box::new(Terminal));
        assert_eq!(scheduler.state_name(), "terminal");
    }
}
