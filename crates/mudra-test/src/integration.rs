//! End-to-end workflow tests
//!
//! These drive the real scheduler, recognizer, recorder, store, and
//! dispatcher together through scripted collaborators: the full
//! record → name → assign → save → recognize → dispatch cycle, motion
//! recording replayed through recognition, and complete mini-game runs.

use std::sync::Arc;

use mudra_core::SessionTime;
use mudra_flow::{
    FlowContext, Response, ResponseDispatcher, ResponseRegistry, Scheduler, SlotInput, Waiting,
};
use mudra_match::Recognizer;
use mudra_store::{GestureStore, MemoryCodec};

use crate::ScriptedPoseSource;

/// A scheduler plus context under a scripted clock
pub struct WorkflowHarness {
    pub scheduler: Scheduler,
    pub ctx: FlowContext,
    now_ms: i64,
    tick_ms: i64,
}

impl WorkflowHarness {
    /// Harness over an in-memory-persisted store, starting in Waiting
    pub fn new(
        codec: MemoryCodec,
        source: ScriptedPoseSource,
        responses: Vec<Arc<dyn Response>>,
    ) -> Self {
        let mut registry = ResponseRegistry::new();
        for response in responses {
            registry.register(response);
        }

        let ctx = FlowContext::new(
            GestureStore::new(Box::new(codec)),
            Recognizer::new(),
            ResponseDispatcher::new(registry),
            Box::new(source),
            Box::new(SlotInput::new()),
        );

        WorkflowHarness {
            scheduler: Scheduler::new(Box::new(Waiting::new())),
            ctx,
            now_ms: 0,
            tick_ms: 50,
        }
    }

    pub fn now(&self) -> SessionTime {
        SessionTime::from_millis(self.now_ms)
    }

    /// Jump the clock forward without ticking
    pub fn advance_time(&mut self, millis: i64) {
        self.now_ms += millis;
    }

    pub fn tick(&mut self) {
        self.now_ms += self.tick_ms;
        self.scheduler
            .tick(&mut self.ctx, SessionTime::from_millis(self.now_ms));
    }

    /// Tick until the scheduler reaches `state`, panicking past `limit`
    pub fn tick_until(&mut self, state: &str, limit: u32) {
        for _ in 0..limit {
            if self.scheduler.state_name() == state {
                return;
            }
            self.tick();
        }
        panic!(
            "never reached '{state}', stuck in '{}'",
            self.scheduler.state_name()
        );
    }

    /// Supply text input, as the embedding's UI would
    pub fn offer_input(&mut self, text: &str) {
        let mut slot = SlotInput::new();
        slot.offer(text);
        self.ctx.set_input(Box::new(slot));
    }

    /// Replace the pose source mid-run
    pub fn set_pose(&mut self, source: ScriptedPoseSource) {
        self.ctx.set_pose_source(Box::new(source));
    }
}
