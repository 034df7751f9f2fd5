//! Capture of fired gesture events.

use fingers_core::{EventType, FingerSnapshot, Gesture, GestureData, HandlerId, Recognizer};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// One fired event, with the listened fingers as they were at fire time.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedEvent {
    /// Name of the firing gesture.
    pub gesture: &'static str,
    /// Event kind.
    pub kind: EventType,
    /// Event payload.
    pub data: GestureData,
    /// Listened fingers at fire time.
    pub fingers: Vec<FingerSnapshot>,
}

/// Shared event log that any number of gestures can write to.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<RecordedEvent>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every event `gesture` fires from now on.
    pub fn attach<R: Recognizer>(&self, gesture: &Gesture<R>) -> HandlerId {
        let events = Rc::clone(&self.events);
        let name = gesture.name();
        gesture.add_handler(move |kind, data, fingers| {
            events.borrow_mut().push(RecordedEvent {
                gesture: name,
                kind,
                data: data.clone(),
                fingers: fingers.iter().map(|f| f.snapshot()).collect(),
            });
        })
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<EventType> {
        self.events.borrow().iter().map(|e| e.kind).collect()
    }

    /// Events fired by gestures named `gesture`.
    pub fn of(&self, gesture: &str) -> Vec<RecordedEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.gesture == gesture)
            .cloned()
            .collect()
    }

    /// Number of recorded events of `kind`.
    pub fn count(&self, kind: EventType) -> usize {
        self.events.borrow().iter().filter(|e| e.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Dump the log as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*self.events.borrow())
    }
}
