//! Gesture-management workflow
//!
//! Waiting → RecordStart → NameGesture → SelectResponse → SaveGesture →
//! Waiting. The Waiting state's continuous recognition polling and any
//! active recording session are mutually exclusive: RecordStart
//! suppresses recognition for the whole session plus the post-record
//! debounce, so a just-recorded pose is never immediately recognized as
//! matching itself.

use std::time::Duration;

use tracing::{debug, warn};

use mudra_core::{Gesture, SessionTime};
use mudra_record::{capture_frame, RecordStatus, RecordingSession};

use crate::{FlowContext, FlowState, Intent, Phase, PreGame, Verdict};

/// Idle state: poll recognition every tick, dispatch on new matches,
/// react to user intents.
#[derive(Default)]
pub struct Waiting {
    previous_match: Option<String>,
}

impl Waiting {
    pub fn new() -> Self {
        Waiting::default()
    }
}

impl FlowState for Waiting {
    fn name(&self) -> &'static str {
        "waiting"
    }

    fn on_end(&mut self, ctx: &mut FlowContext, now: SessionTime) -> Verdict {
        match ctx.take_intent() {
            Some(Intent::BeginRecording { duration }) => {
                return Verdict::Next(Box::new(RecordStart::new(duration)));
            }
            Some(Intent::EnterGame) => {
                return Verdict::Next(Box::new(PreGame::new()));
            }
            Some(Intent::NextGesture) => {
                if let Some(gesture) = ctx.cursor.next(&ctx.store) {
                    debug!(gesture = gesture.name(), "selected next gesture");
                }
            }
            Some(Intent::PreviousGesture) => {
                if let Some(gesture) = ctx.cursor.previous(&ctx.store) {
                    debug!(gesture = gesture.name(), "selected previous gesture");
                }
            }
            Some(other) => debug!(intent = ?other, "intent has no effect here"),
            None => {}
        }

        let live = capture_frame(ctx.pose.as_mut());
        let FlowContext {
            store,
            recognizer,
            dispatcher,
            ..
        } = ctx;

        match recognizer.recognize(now, &live, store.iter()) {
            Some(matched) => {
                let is_new = self.previous_match.as_deref() != Some(matched.name.as_str());
                if is_new {
                    match store.get(&matched.name).and_then(|g| g.response_name()) {
                        Some(response) => {
                            dispatcher.dispatch(response);
                        }
                        None => {
                            warn!(gesture = %matched.name, "recognized gesture has no response")
                        }
                    }
                }
                self.previous_match = Some(matched.name);
            }
            None => self.previous_match = None,
        }

        Verdict::Pending
    }
}

/// Runs a recording session to completion, recognition suppressed
pub struct RecordStart {
    duration: Duration,
    session: Option<RecordingSession>,
}

impl RecordStart {
    /// `None` requests the default static capture
    pub fn new(duration: Option<Duration>) -> Self {
        RecordStart {
            duration: duration.unwrap_or(Duration::ZERO),
            session: None,
        }
    }
}

impl FlowState for RecordStart {
    fn name(&self) -> &'static str {
        "record-start"
    }

    fn on_start(&mut self, ctx: &mut FlowContext, now: SessionTime) -> Phase {
        ctx.recognizer.begin_recording();
        self.session = Some(RecordingSession::begin(
            ctx.record_config.clone(),
            self.duration,
            ctx.pose.as_mut(),
            now,
        ));
        Phase::Complete
    }

    fn on_end(&mut self, ctx: &mut FlowContext, now: SessionTime) -> Verdict {
        let Some(session) = self.session.as_mut() else {
            warn!("recording session missing; abandoning record state");
            return Verdict::Next(Box::new(Waiting::new()));
        };

        match session.poll(ctx.pose.as_mut(), now) {
            RecordStatus::Sampling => Verdict::Pending,
            RecordStatus::Complete => {
                if let Some(finished) = self.session.take() {
                    ctx.pending_frames = Some(finished.into_frames());
                }
                ctx.recognizer.finish_recording(now);
                Verdict::Next(Box::new(NameGesture))
            }
        }
    }
}

/// Blocks cooperatively until the input collaborator supplies a name
pub struct NameGesture;

impl FlowState for NameGesture {
    fn name(&self) -> &'static str {
        "name-gesture"
    }

    fn on_end(&mut self, ctx: &mut FlowContext, _now: SessionTime) -> Verdict {
        let name = match ctx.input.pending() {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => return Verdict::Pending,
        };
        ctx.input.clear();

        debug!(gesture = %name, "gesture named");
        ctx.pending_name = Some(name);
        Verdict::Next(Box::new(SelectResponse))
    }
}

/// Blocks until a registered response is chosen by name; an unrecognized
/// choice re-prompts without advancing.
pub struct SelectResponse;

impl FlowState for SelectResponse {
    fn name(&self) -> &'static str {
        "select-response"
    }

    fn on_start(&mut self, ctx: &mut FlowContext, _now: SessionTime) -> Phase {
        debug!(available = ?ctx.dispatcher.registry().names(), "choose a response");
        Phase::Complete
    }

    fn on_end(&mut self, ctx: &mut FlowContext, _now: SessionTime) -> Verdict {
        let choice = match ctx.input.pending() {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => return Verdict::Pending,
        };
        ctx.input.clear();

        match ctx.dispatcher.resolve(&choice) {
            Some(response) => {
                ctx.pending_response = Some(response.name().to_string());
                Verdict::Next(Box::new(SaveGesture))
            }
            None => {
                warn!(choice = %choice, "not a registered response, choose again");
                Verdict::Pending
            }
        }
    }
}

/// Constructs the gesture from the staged pieces, stores it, persists
pub struct SaveGesture;

impl FlowState for SaveGesture {
    fn name(&self) -> &'static str {
        "save-gesture"
    }

    fn on_start(&mut self, ctx: &mut FlowContext, _now: SessionTime) -> Phase {
        let (Some(name), Some(frames)) = (ctx.pending_name.take(), ctx.pending_frames.take())
        else {
            warn!("nothing staged to save");
            return Phase::Complete;
        };

        match Gesture::new(name, frames) {
            Ok(mut gesture) => {
                if let Some(response) = ctx.pending_response.take() {
                    gesture = gesture.with_response(response);
                }
                debug!(
                    gesture = gesture.name(),
                    frames = gesture.frame_count(),
                    "saving gesture"
                );
                ctx.store.put(gesture);
                if let Err(e) = ctx.store.save() {
                    warn!("gesture persistence failed: {e}");
                }
            }
            Err(e) => warn!("discarding unsaveable recording: {e}"),
        }
        Phase::Complete
    }

    fn on_end(&mut self, _ctx: &mut FlowContext, _now: SessionTime) -> Verdict {
        Verdict::Next(Box::new(Waiting::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use mudra_core::{BonePose, Frame, Vec3};
    use mudra_match::Recognizer;
    use mudra_record::PoseSource;
    use mudra_store::GestureStore;

    use crate::{FnResponse, ResponseDispatcher, ResponseRegistry, Scheduler, SlotInput};

    /// Pose source frozen on a single pose
    struct FixedPose;

    impl PoseSource for FixedPose {
        fn current_frame(&mut self) -> Frame {
            let mut frame = Frame::new();
            frame.set("IndexTip", BonePose::new(Vec3::new(0.2, 0.4, 0.6), Default::default()));
            frame
        }

        fn hand_root_pose(&mut self) -> BonePose {
            BonePose::default()
        }
    }

    struct Harness {
        scheduler: Scheduler,
        ctx: FlowContext,
        now_ms: i64,
        runs: Arc<AtomicUsize>,
    }

    impl Harness {
        fn new() -> Self {
            let runs = Arc::new(AtomicUsize::new(0));
            let witness = Arc::clone(&runs);

            let mut registry = ResponseRegistry::new();
            registry.register(Arc::new(FnResponse::new("toggle-color", move || {
                witness.fetch_add(1, Ordering::SeqCst);
            })));
            registry.register(Arc::new(FnResponse::new("swap-shape", || {})));

            let ctx = FlowContext::new(
                GestureStore::in_memory(),
                Recognizer::new(),
                ResponseDispatcher::new(registry),
                Box::new(FixedPose),
                Box::new(SlotInput::new()),
            );

            Harness {
                scheduler: Scheduler::new(Box::new(Waiting::new())),
                ctx,
                now_ms: 0,
                runs,
            }
        }

        /// Supply text input, as the embedding's UI would
        fn offer(&mut self, text: &str) {
            let mut slot = SlotInput::new();
            slot.offer(text);
            self.ctx.input = Box::new(slot);
        }

        fn tick(&mut self) {
            self.now_ms += 10;
            self.scheduler
                .tick(&mut self.ctx, SessionTime::from_millis(self.now_ms));
        }

        fn tick_until(&mut self, state: &str, limit: u32) {
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
    }

    #[test]
    fn test_record_name_assign_save_pipeline() {
        let mut harness = Harness::new();

        harness.tick(); // waiting start
        harness.ctx.signal(Intent::BeginRecording { duration: None });
        harness.tick_until("record-start", 5);
        harness.tick_until("name-gesture", 5);

        // Blocks until named.
        harness.tick();
        harness.tick();
        assert_eq!(harness.scheduler.state_name(), "name-gesture");

        harness.offer("  fist  ");
        harness.tick_until("select-response", 5);

        // Unrecognized choice re-prompts.
        harness.tick(); // select start
        harness.offer("explode");
        harness.tick();
        harness.tick();
        assert_eq!(harness.scheduler.state_name(), "select-response");

        harness.offer("TOGGLE-color");
        harness.tick_until("save-gesture", 5);
        harness.tick_until("waiting", 5);

        let saved = harness.ctx.store().get("fist").expect("gesture saved");
        assert!(saved.is_static());
        // Canonical registry casing was stored.
        assert_eq!(saved.response_name(), Some("toggle-color"));
        assert_eq!(harness.ctx.store().len(), 1);
    }

    #[test]
    fn test_waiting_dispatches_once_per_new_match() {
        let mut harness = Harness::new();

        harness.tick();
        harness.ctx.signal(Intent::BeginRecording { duration: None });
        harness.tick_until("name-gesture", 5);
        harness.offer("fist");
        harness.tick_until("select-response", 5);
        harness.offer("toggle-color");
        harness.tick_until("waiting", 10);

        // Within the debounce window nothing fires, even though the live
        // pose is exactly the recorded one.
        for _ in 0..5 {
            harness.tick();
        }
        assert_eq!(harness.runs.load(Ordering::SeqCst), 0);

        // Step past the debounce window.
        harness.now_ms += 1200;
        harness.tick();
        assert_eq!(harness.runs.load(Ordering::SeqCst), 1);

        // Held pose: same match every tick, no re-dispatch.
        for _ in 0..5 {
            harness.tick();
        }
        assert_eq!(harness.runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_navigation_intents_cycle_cursor() {
        let mut harness = Harness::new();
        harness
            .ctx
            .store_mut()
            .put(Gesture::new("a", vec![Frame::new()]).unwrap());
        harness
            .ctx
            .store_mut()
            .put(Gesture::new("b", vec![Frame::new()]).unwrap());

        harness.tick(); // waiting start
        harness.ctx.signal(Intent::NextGesture);
        harness.tick();
        assert_eq!(harness.ctx.cursor().index(), 1);

        harness.ctx.signal(Intent::NextGesture);
        harness.tick();
        assert_eq!(harness.ctx.cursor().index(), 0);
    }

    #[test]
    fn test_navigation_on_empty_store_is_harmless() {
        let mut harness = Harness::new();
        harness.tick();
        harness.ctx.signal(Intent::NextGesture);
        harness.tick();
        assert_eq!(harness.ctx.cursor().index(), 0);
        assert_eq!(harness.scheduler.state_name(), "waiting");
    }
}
