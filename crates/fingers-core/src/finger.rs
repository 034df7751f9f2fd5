//! Fingers: the engine's view of one raw contact.
//!
//! A [`Finger`] is shared (`Rc`) between every instance that tracks its id and
//! every gesture that listens to it. Its mutable parts live in cells so that
//! kinematic queries can be made through a shared reference while the owning
//! instance keeps moving it.

use crate::gesture::{GestureId, GestureObject};
use crate::metrics::{Metric, MetricCache};
use crate::position::Position;
use crate::utils::{self, Direction};
use serde::{Deserialize, Serialize, Serializer};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared handle to a finger.
pub type FingerRef = Rc<Finger>;

/// Time without movement after which a finger counts as inactive (ms).
pub const INACTIVITY_THRESHOLD_MS: f64 = 100.0;

/// Identifier of a contact: a touch identifier or a mouse button index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct FingerId(pub u32);

impl FingerId {
    /// Id used for the primary mouse button.
    pub const MOUSE_PRIMARY: Self = Self(0);

    /// Create a new finger ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for FingerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a finger. `Removed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerState {
    /// Contact is down.
    #[default]
    Active,
    /// Contact was lifted or canceled.
    Removed,
}

/// Plain-data copy of a finger at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FingerSnapshot {
    /// Contact id.
    pub id: FingerId,
    /// State when the snapshot was taken.
    pub state: FingerState,
    /// Position at contact start.
    pub start: Position,
    /// Latest position.
    pub current: Position,
}

struct Subscriber {
    gesture: GestureId,
    observer: Weak<dyn GestureObject>,
}

/// Per-contact lifecycle object with memoized kinematics.
pub struct Finger {
    id: FingerId,
    state: Cell<FingerState>,
    start: Position,
    previous: Cell<Position>,
    current: Cell<Position>,
    listener_count: Cell<usize>,
    subscribers: RefCell<Vec<Subscriber>>,
    cache: MetricCache,
}

impl Finger {
    /// Create an active finger whose three positions are the same sample.
    #[must_use]
    pub fn new(id: FingerId, timestamp: f64, x: f64, y: f64) -> Self {
        let position = Position::new(timestamp, x, y);
        Self {
            id,
            state: Cell::new(FingerState::Active),
            start: position,
            previous: Cell::new(position),
            current: Cell::new(position),
            listener_count: Cell::new(0),
            subscribers: RefCell::new(Vec::new()),
            cache: MetricCache::default(),
        }
    }

    /// Contact id.
    pub const fn id(&self) -> FingerId {
        self.id
    }

    pub fn state(&self) -> FingerState {
        self.state.get()
    }

    /// Check if the contact is still down.
    pub fn is_active(&self) -> bool {
        self.state.get() == FingerState::Active
    }

    /// Position at contact start.
    pub const fn start_position(&self) -> Position {
        self.start
    }

    /// Position before the latest update.
    pub fn previous_position(&self) -> Position {
        self.previous.get()
    }

    /// Latest position.
    pub fn current_position(&self) -> Position {
        self.current.get()
    }

    /// Timestamp of the last position update.
    pub fn time(&self) -> f64 {
        self.current.get().timestamp
    }

    pub fn x(&self) -> f64 {
        self.current.get().x
    }

    pub fn y(&self) -> f64 {
        self.current.get().y
    }

    /// Number of instances currently tracking this finger.
    pub fn listener_count(&self) -> usize {
        self.listener_count.get()
    }

    /// Number of gestures currently subscribed to this finger.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Whether `metric` has been computed since the last position change.
    pub fn is_cached(&self, metric: Metric) -> bool {
        self.cache.is_clean(metric)
    }

    /// Capture the current state as plain data.
    pub fn snapshot(&self) -> FingerSnapshot {
        FingerSnapshot {
            id: self.id,
            state: self.state(),
            start: self.start,
            current: self.current_position(),
        }
    }

    // ---- time ----

    /// Time (ms) between the previous and current positions.
    pub fn delta_time(&self) -> f64 {
        self.cache
            .delta_time
            .get_or_compute(|| self.current_position().elapsed_since(&self.previous_position()))
    }

    /// Time (ms) since contact start.
    pub fn total_time(&self) -> f64 {
        self.cache
            .total_time
            .get_or_compute(|| self.current_position().elapsed_since(&self.start))
    }

    /// Time since the last update at `now`, or `0` below the inactivity
    /// threshold.
    pub fn inactivity_time(&self, now: f64) -> f64 {
        let delta = now - self.time();
        if delta > INACTIVITY_THRESHOLD_MS {
            delta
        } else {
            0.0
        }
    }

    // ---- distance ----

    /// Horizontal movement since the previous position.
    pub fn delta_x(&self) -> f64 {
        self.cache
            .delta_x
            .get_or_compute(|| self.x() - self.previous_position().x)
    }

    /// Vertical movement since the previous position.
    pub fn delta_y(&self) -> f64 {
        self.cache
            .delta_y
            .get_or_compute(|| self.y() - self.previous_position().y)
    }

    /// Distance covered since the previous position.
    pub fn delta_distance(&self) -> f64 {
        self.cache
            .delta_distance
            .get_or_compute(|| utils::distance(self.delta_x(), self.delta_y()))
    }

    /// Horizontal movement since contact start.
    pub fn total_x(&self) -> f64 {
        self.cache.total_x.get_or_compute(|| self.x() - self.start.x)
    }

    /// Vertical movement since contact start.
    pub fn total_y(&self) -> f64 {
        self.cache.total_y.get_or_compute(|| self.y() - self.start.y)
    }

    /// Distance between the start and current positions.
    pub fn distance(&self) -> f64 {
        self.cache
            .total_distance
            .get_or_compute(|| utils::distance(self.total_x(), self.total_y()))
    }

    // ---- direction ----

    /// Dominant direction of the latest movement.
    pub fn delta_direction(&self) -> Direction {
        self.cache
            .delta_direction
            .get_or_compute(|| utils::direction(self.delta_x(), self.delta_y()))
    }

    /// Direction of the whole movement since the finger went down.
    pub fn direction(&self) -> Direction {
        self.cache
            .total_direction
            .get_or_compute(|| utils::direction(self.total_x(), self.total_y()))
    }

    // ---- velocity ----

    /// Horizontal speed (px/ms) of the latest movement.
    pub fn velocity_x(&self) -> f64 {
        self.cache
            .velocity_x
            .get_or_compute(|| utils::velocity(self.delta_time(), self.delta_x()))
    }

    /// Vertical speed (px/ms) of the latest movement.
    pub fn velocity_y(&self) -> f64 {
        self.cache
            .velocity_y
            .get_or_compute(|| utils::velocity(self.delta_time(), self.delta_y()))
    }

    /// Speed (px/ms) of the latest movement.
    pub fn velocity(&self) -> f64 {
        self.cache
            .velocity
            .get_or_compute(|| utils::velocity(self.delta_time(), self.delta_distance()))
    }

    /// Mean speed over the whole contact.
    pub fn velocity_average(&self) -> f64 {
        self.cache
            .velocity_average
            .get_or_compute(|| utils::velocity(self.total_time(), self.distance()))
    }

    /// Signed horizontal velocity (px/ms) of the latest movement.
    pub fn oriented_velocity_x(&self) -> f64 {
        self.cache
            .oriented_velocity_x
            .get_or_compute(|| utils::oriented_velocity(self.delta_time(), self.delta_x()))
    }

    /// Signed vertical velocity (px/ms) of the latest movement.
    pub fn oriented_velocity_y(&self) -> f64 {
        self.cache
            .oriented_velocity_y
            .get_or_compute(|| utils::oriented_velocity(self.delta_time(), self.delta_y()))
    }

    // ---- instance bookkeeping ----

    pub(crate) fn retain(&self) -> usize {
        let count = self.listener_count.get() + 1;
        self.listener_count.set(count);
        count
    }

    pub(crate) fn release(&self) -> usize {
        let count = self.listener_count.get().saturating_sub(1);
        self.listener_count.set(count);
        count
    }

    /// Write a new current position. Returns `false` when nothing changed.
    pub(crate) fn set_current(&self, timestamp: f64, x: f64, y: f64, force: bool) -> bool {
        let next = Position::new(timestamp, x, y);
        let current = self.current.get();
        if !force && current.same_point(&next) {
            return false;
        }
        self.cache.clear();
        self.previous.set(current);
        self.current.set(next);
        true
    }

    /// Move the finger and notify its subscribers if the point changed.
    pub(crate) fn move_to(self: &Rc<Self>, timestamp: f64, x: f64, y: f64) -> bool {
        let moved = self.set_current(timestamp, x, y, false);
        if moved {
            self.notify_update();
        }
        moved
    }

    /// Terminate the finger: settle, mark removed, notify, unsubscribe all.
    pub(crate) fn finish(self: &Rc<Self>, timestamp: f64) {
        if !self.is_active() {
            return;
        }

        // a long pause before lifting means the finger is at rest
        if timestamp - self.time() > INACTIVITY_THRESHOLD_MS {
            let current = self.current_position();
            self.set_current(timestamp, current.x, current.y, true);
            self.notify_update();
        }

        self.state.set(FingerState::Removed);
        for observer in self.observers() {
            observer.finger_removed(self);
        }
        self.subscribers.borrow_mut().clear();
    }

    pub(crate) fn subscribe(&self, gesture: GestureId, observer: Weak<dyn GestureObject>) {
        self.subscribers
            .borrow_mut()
            .push(Subscriber { gesture, observer });
    }

    pub(crate) fn unsubscribe(&self, gesture: GestureId) {
        let mut subscribers = self.subscribers.borrow_mut();
        if let Some(index) = subscribers.iter().position(|s| s.gesture == gesture) {
            subscribers.remove(index);
        }
    }

    fn notify_update(self: &Rc<Self>) {
        for observer in self.observers() {
            observer.finger_updated(self);
        }
    }

    /// Snapshot of live subscribers; notifications may unsubscribe.
    fn observers(&self) -> Vec<Rc<dyn GestureObject>> {
        self.subscribers
            .borrow()
            .iter()
            .filter_map(|s| s.observer.upgrade())
            .collect()
    }
}

impl fmt::Debug for Finger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Finger")
            .field("id", &self.id)
            .field("state", &self.state.get())
            .field("start", &self.start)
            .field("current", &self.current.get())
            .field("listener_count", &self.listener_count.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl Serialize for Finger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}
