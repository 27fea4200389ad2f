//! Scripted end-to-end demo of the MUDRA workflow.
//!
//! Wires a synthetic pose source, slot input, and the three illustrative
//! responses into the scheduler, then drives one full
//! record → name → assign → save → recognize cycle under a simulated
//! clock, logging everything through tracing.

use std::sync::Arc;
use std::time::Duration;

use mudra_core::{BonePose, Frame, SessionTime, Vec3};
use mudra_flow::{
    FlowContext, FnResponse, Intent, ResponseDispatcher, ResponseRegistry, Scheduler, SlotInput,
    Waiting,
};
use mudra_match::Recognizer;
use mudra_record::PoseSource;
use mudra_store::{GestureStore, JsonFileCodec};

/// Synthetic hand frozen in a "salute" pose
struct SyntheticHand;

impl PoseSource for SyntheticHand {
    fn current_frame(&mut self) -> Frame {
        let mut frame = Frame::new();
        frame.set("IndexTip", BonePose::new(Vec3::new(0.2, 1.0, 0.1), Default::default()));
        frame.set("ThumbTip", BonePose::new(Vec3::new(0.4, 0.8, 0.2), Default::default()));
        frame
    }

    fn hand_root_pose(&mut self) -> BonePose {
        BonePose::default()
    }
}

fn registry() -> ResponseRegistry {
    let mut registry = ResponseRegistry::new();
    registry.register(Arc::new(FnResponse::new("toggle-color", || {
        tracing::info!("color toggled");
    })));
    registry.register(Arc::new(FnResponse::new("swap-shape", || {
        tracing::info!("shape swapped");
    })));
    registry.register(Arc::new(FnResponse::new("toggle-color-and-swap-shape", || {
        tracing::info!("color toggled and shape swapped");
    })));
    registry
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let store_path = std::env::temp_dir().join("mudra-demo-gestures.json");
    let mut store = GestureStore::new(Box::new(JsonFileCodec::new(&store_path)));
    if let Err(e) = store.load() {
        tracing::warn!("could not load stored gestures: {e}");
    }
    tracing::info!(gestures = store.len(), path = %store_path.display(), "store ready");

    let mut ctx = FlowContext::new(
        store,
        Recognizer::new(),
        ResponseDispatcher::new(registry()),
        Box::new(SyntheticHand),
        Box::new(SlotInput::new()),
    );
    let mut scheduler = Scheduler::new(Box::new(Waiting::new()));

    let mut now = SessionTime::ZERO;
    let tick = |scheduler: &mut Scheduler, ctx: &mut FlowContext, now: &mut SessionTime| {
        *now = *now + Duration::from_millis(50);
        scheduler.tick(ctx, *now);
    };

    // Record the held pose as a static gesture.
    tick(&mut scheduler, &mut ctx, &mut now);
    ctx.signal(Intent::BeginRecording { duration: None });
    while scheduler.state_name() != "name-gesture" {
        tick(&mut scheduler, &mut ctx, &mut now);
    }

    // Name it, as keyboard/voice input would.
    let mut input = SlotInput::new();
    input.offer("salute");
    ctx.set_input(Box::new(input));
    while scheduler.state_name() != "select-response" {
        tick(&mut scheduler, &mut ctx, &mut now);
    }

    let mut input = SlotInput::new();
    input.offer("toggle-color");
    ctx.set_input(Box::new(input));
    while scheduler.state_name() != "waiting" {
        tick(&mut scheduler, &mut ctx, &mut now);
    }
    tracing::info!(gestures = ctx.store().len(), "gesture saved");

    // Let the debounce window pass, then watch recognition fire.
    now = now + Duration::from_millis(1200);
    for _ in 0..10 {
        tick(&mut scheduler, &mut ctx, &mut now);
    }

    let stats = ctx.dispatcher().stats();
    tracing::info!(dispatched = stats.dispatched, "demo complete");
}
