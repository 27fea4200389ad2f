//! Workflow context
//!
//! One explicitly-owned bundle of every collaborator the workflow states
//! touch: the store, recognizer, dispatcher, selection cursor, pose and
//! input sources, the pending intent slot, and the staging fields the
//! record → name → assign → save pipeline hands from state to state.
//! Constructed once at the top level and passed by reference into the
//! scheduler; there are no process-wide singletons.

use mudra_core::Frame;
use mudra_match::Recognizer;
use mudra_record::{PoseSource, RecordConfig};
use mudra_store::{GestureCursor, GestureStore};

use crate::{InputCollector, Intent, ResponseDispatcher};

/// Everything the workflow states operate on
pub struct FlowContext {
    pub(crate) store: GestureStore,
    pub(crate) recognizer: Recognizer,
    pub(crate) dispatcher: ResponseDispatcher,
    pub(crate) cursor: GestureCursor,
    pub(crate) pose: Box<dyn PoseSource>,
    pub(crate) input: Box<dyn InputCollector>,
    pub(crate) record_config: RecordConfig,
    pub(crate) intent: Option<Intent>,
    // Staging for the record → save pipeline
    pub(crate) pending_frames: Option<Vec<Frame>>,
    pub(crate) pending_name: Option<String>,
    pub(crate) pending_response: Option<String>,
}

impl FlowContext {
    pub fn new(
        store: GestureStore,
        recognizer: Recognizer,
        dispatcher: ResponseDispatcher,
        pose: Box<dyn PoseSource>,
        input: Box<dyn InputCollector>,
    ) -> Self {
        FlowContext {
            store,
            recognizer,
            dispatcher,
            cursor: GestureCursor::new(),
            pose,
            input,
            record_config: RecordConfig::default(),
            intent: None,
            pending_frames: None,
            pending_name: None,
            pending_response: None,
        }
    }

    pub fn with_record_config(mut self, config: RecordConfig) -> Self {
        self.record_config = config;
        self
    }

    /// Signal a user intent. A newer signal replaces an unconsumed one.
    pub fn signal(&mut self, intent: Intent) {
        self.intent = Some(intent);
    }

    /// Swap the text-input collaborator
    pub fn set_input(&mut self, input: Box<dyn InputCollector>) {
        self.input = input;
    }

    /// Swap the pose source
    pub fn set_pose_source(&mut self, pose: Box<dyn PoseSource>) {
        self.pose = pose;
    }

    pub(crate) fn take_intent(&mut self) -> Option<Intent> {
        self.intent.take()
    }

    pub fn store(&self) -> &GestureStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut GestureStore {
        &mut self.store
    }

    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    pub fn dispatcher(&self) -> &ResponseDispatcher {
        &self.dispatcher
    }

    pub fn cursor(&self) -> &GestureCursor {
        &self.cursor
    }
}
