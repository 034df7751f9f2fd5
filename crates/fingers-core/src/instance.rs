//! Listener instances: turn raw platform input into finger lifecycles and
//! dispatch them to gestures.

use crate::clock::{Clock, SystemClock};
use crate::config::{GestureKind, InstanceConfig};
use crate::error::Result;
use crate::finger::{Finger, FingerId, FingerRef};
use crate::gesture::{DynGestureHandle, Gesture, GestureHandle, GestureObject, Recognizer};
use crate::input::{Contact, EventDisposition, InputMode, InputSurface, RawInput, PRIMARY_BUTTON};
use crate::registry::FingerRegistry;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Gesture engine bound to one input surface.
///
/// An instance consumes either touch or mouse primitives (decided once at
/// construction), maintains the list of fingers currently down on it and
/// notifies its gestures, oldest first.
///
/// Fingers are shared through a [`FingerRegistry`]: instances built on clones
/// of the same registry see the same finger for the same contact id, but only
/// the instance that created a finger moves it.
pub struct Instance {
    mode: InputMode,
    registry: FingerRegistry,
    clock: Rc<dyn Clock>,
    fingers: Vec<FingerRef>,
    created: HashMap<FingerId, FingerRef>,
    gestures: Vec<Rc<dyn GestureObject>>,
    listening: bool,
    mouse_captured: bool,
    last_input: Option<f64>,
}

impl Instance {
    /// Create an instance reading wall-clock time.
    pub fn new<S: InputSurface + ?Sized>(surface: &S, registry: FingerRegistry) -> Self {
        Self::with_clock(surface, registry, Rc::new(SystemClock))
    }

    pub fn with_clock<S: InputSurface + ?Sized>(
        surface: &S,
        registry: FingerRegistry,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self::with_mode(InputMode::detect(surface), registry, clock)
    }

    /// Create an instance with a forced input mode.
    #[must_use]
    pub fn with_mode(mode: InputMode, registry: FingerRegistry, clock: Rc<dyn Clock>) -> Self {
        log::debug!("new {mode:?} instance");
        Self {
            mode,
            registry,
            clock,
            fingers: Vec::new(),
            created: HashMap::new(),
            gestures: Vec::new(),
            listening: true,
            mouse_captured: false,
            last_input: None,
        }
    }

    /// Build an instance and its gestures from configuration.
    ///
    /// The configured input mode, when present, overrides detection. Returns
    /// the gesture handles in configuration order.
    ///
    /// # Errors
    ///
    /// Returns the first invalid option found in `config`.
    pub fn from_config<S: InputSurface + ?Sized>(
        surface: &S,
        registry: FingerRegistry,
        clock: Rc<dyn Clock>,
        config: &InstanceConfig,
    ) -> Result<(Self, Vec<DynGestureHandle>)> {
        config.validate()?;
        let mode = config
            .input_mode
            .unwrap_or_else(|| InputMode::detect(surface));
        let mut instance = Self::with_mode(mode, registry, clock);
        let handles = config
            .gestures
            .iter()
            .map(|kind| instance.add_gesture_kind(kind.clone()))
            .collect::<Result<Vec<_>>>()?;
        Ok((instance, handles))
    }

    // ---- accessors ----

    pub const fn input_mode(&self) -> InputMode {
        self.mode
    }

    pub const fn registry(&self) -> &FingerRegistry {
        &self.registry
    }

    /// Fingers down on this instance, oldest first.
    pub fn fingers(&self) -> &[FingerRef] {
        &self.fingers
    }

    pub fn gesture_count(&self) -> usize {
        self.gestures.len()
    }

    pub const fn is_listening(&self) -> bool {
        self.listening
    }

    /// Whether a primary mouse press is in progress.
    pub const fn is_mouse_captured(&self) -> bool {
        self.mouse_captured
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    // ---- gestures ----

    /// Register a gesture. It only sees fingers added from now on.
    pub fn add_gesture<R: Recognizer>(&mut self, recognizer: R) -> GestureHandle<R> {
        let gesture = Gesture::new(recognizer);
        log::debug!("add gesture {} ({:?})", gesture.name(), gesture.id());
        let object: Rc<dyn GestureObject> = gesture.clone();
        self.gestures.push(object);
        gesture
    }

    /// Validate and register a gesture described by `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::InvalidOption`] for out-of-range options.
    pub fn add_gesture_kind(&mut self, kind: GestureKind) -> Result<DynGestureHandle> {
        Ok(self.add_gesture(kind.build()?))
    }

    /// Unregister a gesture: release its fingers, drop its handlers and cancel
    /// its timer. Returns `false` if it was not registered here.
    pub fn remove_gesture<R: Recognizer>(&mut self, gesture: &Gesture<R>) -> bool {
        let Some(index) = self.gestures.iter().position(|g| g.id() == gesture.id()) else {
            return false;
        };
        let removed = self.gestures.remove(index);
        removed.detach();
        log::debug!("removed gesture {}", gesture.name());
        true
    }

    /// Unregister every gesture.
    pub fn remove_all_gestures(&mut self) {
        for gesture in std::mem::take(&mut self.gestures) {
            gesture.detach();
        }
    }

    // ---- listening ----

    /// Release every finger of this instance and ignore further input.
    ///
    /// Fingers are finished at the timestamp of the last accepted input, so
    /// their times stay in the time base of the host's events.
    pub fn stop_listening(&mut self) {
        if !self.listening {
            return;
        }
        let at = self.last_input.unwrap_or_else(|| self.clock.now());
        self.remove_all_fingers(at);
        self.mouse_captured = false;
        self.listening = false;
    }

    /// Resume input processing.
    pub fn start_listening(&mut self) {
        self.listening = true;
    }

    // ---- input ----

    /// Run gesture timers due at `now`.
    pub fn advance(&self, now: f64) {
        for gesture in self.gestures.clone() {
            gesture.advance(now);
        }
    }

    /// Process one raw input.
    pub fn handle(&mut self, input: &RawInput) -> EventDisposition {
        if !self.listening || input.mode() != self.mode {
            log::trace!("ignored {input:?}");
            return EventDisposition::Ignored;
        }
        self.last_input = Some(input.timestamp());
        self.advance(input.timestamp());

        match input {
            RawInput::TouchStart { timestamp, touches } => {
                for touch in touches {
                    self.create_finger(touch.id, *timestamp, touch.x, touch.y);
                }
                EventDisposition::Handled
            }
            RawInput::TouchMove { timestamp, touches } => {
                for touch in touches {
                    self.update_finger(touch.id, *timestamp, touch.x, touch.y);
                }
                EventDisposition::PreventDefault
            }
            RawInput::TouchEnd { timestamp, touches } => {
                for touch in touches {
                    self.remove_finger(touch.id, *timestamp);
                }
                EventDisposition::Handled
            }
            RawInput::TouchCancel { timestamp, touches } => {
                self.cancel(touches, *timestamp);
                EventDisposition::Handled
            }
            RawInput::MouseDown {
                timestamp,
                button,
                x,
                y,
            } => self.mouse_down(*timestamp, *button, *x, *y),
            RawInput::MouseMove {
                timestamp,
                button,
                x,
                y,
            } => {
                if !self.mouse_captured {
                    return EventDisposition::Ignored;
                }
                if *button == PRIMARY_BUTTON {
                    self.update_finger(FingerId::MOUSE_PRIMARY, *timestamp, *x, *y);
                }
                EventDisposition::Handled
            }
            RawInput::MouseUp { timestamp, .. } => {
                if !self.mouse_captured {
                    return EventDisposition::Ignored;
                }
                self.mouse_captured = false;
                self.remove_finger(FingerId::MOUSE_PRIMARY, *timestamp);
                EventDisposition::Handled
            }
        }
    }

    fn mouse_down(&mut self, timestamp: f64, button: u16, x: f64, y: f64) -> EventDisposition {
        if button != PRIMARY_BUTTON {
            return EventDisposition::Ignored;
        }
        // a press while the previous one is still tracked means its
        // release was lost
        if self.tracks(FingerId::MOUSE_PRIMARY) {
            log::debug!("mouse down while finger {} is tracked", FingerId::MOUSE_PRIMARY);
            return EventDisposition::Ignored;
        }
        self.mouse_captured = true;
        self.create_finger(FingerId::MOUSE_PRIMARY, timestamp, x, y);
        EventDisposition::PreventDefault
    }

    fn cancel(&mut self, touches: &[Contact], timestamp: f64) {
        if touches.iter().any(|touch| self.tracks(touch.id)) {
            log::debug!("touch cancel, releasing {} finger(s)", self.fingers.len());
            self.remove_all_fingers(timestamp);
        }
    }

    // ---- fingers ----

    fn tracks(&self, id: FingerId) -> bool {
        self.fingers.iter().any(|f| f.id() == id)
    }

    fn create_finger(&mut self, id: FingerId, timestamp: f64, x: f64, y: f64) {
        if self.tracks(id) {
            log::trace!("finger {id} already down");
            return;
        }
        let finger = if let Some(finger) = self.registry.get(id) {
            finger
        } else {
            let finger = Rc::new(Finger::new(id, timestamp, x, y));
            self.registry.insert(Rc::clone(&finger));
            self.created.insert(id, Rc::clone(&finger));
            log::debug!("finger {id} down at ({x}, {y})");
            finger
        };
        finger.retain();
        self.fingers.push(Rc::clone(&finger));

        let fingers = self.fingers.clone();
        for gesture in self.gestures.clone() {
            gesture.finger_added(&finger, &fingers);
        }
    }

    fn update_finger(&self, id: FingerId, timestamp: f64, x: f64, y: f64) {
        if let Some(finger) = self.created.get(&id).cloned() {
            finger.move_to(timestamp, x, y);
        }
    }

    fn remove_finger(&mut self, id: FingerId, timestamp: f64) {
        let Some(index) = self.fingers.iter().position(|f| f.id() == id) else {
            log::trace!("finger {id} is not tracked here");
            return;
        };
        let finger = self.fingers.remove(index);
        self.release(&finger, timestamp);
    }

    fn remove_all_fingers(&mut self, timestamp: f64) {
        for finger in std::mem::take(&mut self.fingers) {
            self.release(&finger, timestamp);
        }
    }

    fn release(&mut self, finger: &FingerRef, timestamp: f64) {
        self.created.remove(&finger.id());
        if finger.release() > 0 {
            return;
        }
        log::debug!("finger {} up", finger.id());
        finger.finish(timestamp);
        if self
            .registry
            .get(finger.id())
            .is_some_and(|f| Rc::ptr_eq(&f, finger))
        {
            self.registry.remove(finger.id());
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("mode", &self.mode)
            .field("fingers", &self.fingers.len())
            .field("gestures", &self.gestures.len())
            .field("listening", &self.listening)
            .field("mouse_captured", &self.mouse_captured)
            .field("last_input", &self.last_input)
            .finish()
    }
}
