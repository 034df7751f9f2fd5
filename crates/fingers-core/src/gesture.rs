//! Gesture base contract.
//!
//! A [`Gesture`] owns the parts every recognizer shares: the ordered list of
//! listened fingers, the ordered handler list and the `fire` fan-out. The
//! recognition logic is a [`Recognizer`] strategy plugged into it.
//!
//! # Dispatch contract
//!
//! - Gestures are notified in registration order, handlers are called in
//!   registration order.
//! - Handler lists and finger subscriber lists are iterated over a snapshot,
//!   so a callback that adds or removes handlers or subscriptions never causes
//!   another callback to be skipped or called twice during the same dispatch.
//! - Events fired by a recognizer hook capture the listened fingers at fire
//!   time and are delivered after the hook returns, once the gesture state is
//!   released. Handlers may therefore query the gesture they belong to.

use crate::finger::{Finger, FingerRef};
use crate::gestures::{PinchData, SwipeData, TapData, TransformData, ZoneData};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
/// Identity of a live gesture, taken from its allocation.
///
/// A finger's subscriber entry holds a `Weak` to the gesture, which keeps the
/// allocation reserved, so an id cannot be reused while any finger still
/// refers to it. No global counter is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GestureId(usize);

impl GestureId {
    fn of<T>(this: &Weak<T>) -> Self {
        Self(this.as_ptr().cast::<()>() as usize)
    }
}

/// Token returned by [`Gesture::add_handler`], used to remove the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Kind of a fired gesture event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// A continuous gesture began.
    Start,
    /// A continuous gesture progressed.
    Move,
    /// A continuous gesture finished.
    End,
    /// A one-shot gesture was recognized.
    Instant,
}

/// Payload of a fired gesture event.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureData {
    /// No payload (drag, hold).
    #[default]
    None,
    /// The finger that changed (raw).
    Finger(FingerRef),
    /// Pinch result.
    Pinch(PinchData),
    /// Swipe result.
    Swipe(SwipeData),
    /// Tap series state.
    Tap(TapData),
    /// Transform progress.
    Transform(TransformData),
    /// Zone crossing.
    Zone(ZoneData),
}

/// Callback invoked with `(type, data, listened fingers)`.
pub type Handler = Rc<dyn Fn(EventType, &GestureData, &[FingerRef])>;

/// Shared handle to a registered gesture.
pub type GestureHandle<R> = Rc<Gesture<R>>;

/// Handle to a gesture built from a [`crate::GestureKind`].
pub type DynGestureHandle = GestureHandle<Box<dyn Recognizer>>;

/// An event waiting to be delivered to handlers.
#[derive(Debug, Clone)]
pub(crate) struct Emission {
    kind: EventType,
    data: GestureData,
    fingers: Vec<FingerRef>,
}

/// Recognition strategy of a gesture.
///
/// Hooks are called with a [`GestureContext`] through which the recognizer
/// subscribes to fingers and fires events.
pub trait Recognizer: 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// A finger went down on the instance. `fingers` lists every finger
    /// currently active on that instance, oldest first.
    fn on_finger_added(
        &mut self,
        ctx: &mut GestureContext<'_>,
        finger: &FingerRef,
        fingers: &[FingerRef],
    );

    /// A listened finger moved.
    fn on_finger_update(&mut self, _ctx: &mut GestureContext<'_>, _finger: &FingerRef) {}

    /// A listened finger was lifted or canceled.
    fn on_finger_removed(&mut self, ctx: &mut GestureContext<'_>, finger: &FingerRef);

    /// Time advanced to `now`. Only recognizers with pending deadlines care.
    fn on_timer(&mut self, _ctx: &mut GestureContext<'_>, _now: f64) {}

    /// The gesture is being removed from its instance.
    fn on_detach(&mut self) {}
}

impl Recognizer for Box<dyn Recognizer> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn on_finger_added(
        &mut self,
        ctx: &mut GestureContext<'_>,
        finger: &FingerRef,
        fingers: &[FingerRef],
    ) {
        (**self).on_finger_added(ctx, finger, fingers);
    }

    fn on_finger_update(&mut self, ctx: &mut GestureContext<'_>, finger: &FingerRef) {
        (**self).on_finger_update(ctx, finger);
    }

    fn on_finger_removed(&mut self, ctx: &mut GestureContext<'_>, finger: &FingerRef) {
        (**self).on_finger_removed(ctx, finger);
    }

    fn on_timer(&mut self, ctx: &mut GestureContext<'_>, now: f64) {
        (**self).on_timer(ctx, now);
    }

    fn on_detach(&mut self) {
        (**self).on_detach();
    }
}

/// Subscription and firing access handed to recognizer hooks.
pub struct GestureContext<'a> {
    id: GestureId,
    observer: Weak<dyn GestureObject>,
    listened: &'a mut Vec<FingerRef>,
    emissions: Vec<Emission>,
}

impl<'a> GestureContext<'a> {
    fn new(id: GestureId, observer: Weak<dyn GestureObject>, listened: &'a mut Vec<FingerRef>) -> Self {
        Self {
            id,
            observer,
            listened,
            emissions: Vec::new(),
        }
    }

    /// Listened fingers, in subscription order.
    pub fn listened_fingers(&self) -> &[FingerRef] {
        self.listened.as_slice()
    }

    pub fn is_listening(&self) -> bool {
        !self.listened.is_empty()
    }

    pub fn is_listened(&self, finger: &Finger) -> bool {
        position_of(self.listened.as_slice(), finger).is_some()
    }

    /// Subscribe to a finger.
    pub fn listen(&mut self, finger: &FingerRef) {
        self.listened.push(Rc::clone(finger));
        finger.subscribe(self.id, self.observer.clone());
    }

    /// Unsubscribe from a finger. Unknown fingers are ignored.
    pub fn unlisten(&mut self, finger: &Finger) {
        if let Some(index) = position_of(self.listened.as_slice(), finger) {
            self.listened.remove(index);
            finger.unsubscribe(self.id);
        }
    }

    pub fn unlisten_all(&mut self) {
        for finger in self.listened.drain(..) {
            finger.unsubscribe(self.id);
        }
    }

    /// Queue an event for the gesture's handlers.
    pub fn fire(&mut self, kind: EventType, data: GestureData) {
        self.emissions.push(Emission {
            kind,
            data,
            fingers: self.listened.clone(),
        });
    }
}

fn position_of(fingers: &[FingerRef], finger: &Finger) -> Option<usize> {
    fingers.iter().position(|f| std::ptr::eq(Rc::as_ptr(f), finger))
}

/// Notifications the engine sends to a gesture, independent of its recognizer.
pub(crate) trait GestureObject {
    fn id(&self) -> GestureId;
    fn finger_added(&self, finger: &FingerRef, fingers: &[FingerRef]);
    fn finger_updated(&self, finger: &FingerRef);
    fn finger_removed(&self, finger: &FingerRef);
    fn advance(&self, now: f64);
    fn detach(&self);
}

struct Inner<R> {
    recognizer: R,
    listened: Vec<FingerRef>,
}

/// A recognizer together with its subscriptions and handlers.
pub struct Gesture<R: Recognizer> {
    id: GestureId,
    this: Weak<Self>,
    inner: RefCell<Inner<R>>,
    handlers: RefCell<Vec<(HandlerId, Handler)>>,
    next_handler: Cell<u64>,
}

impl<R: Recognizer> Gesture<R> {
    pub(crate) fn new(recognizer: R) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            id: GestureId::of(this),
            this: this.clone(),
            inner: RefCell::new(Inner {
                recognizer,
                listened: Vec::new(),
            }),
            handlers: RefCell::new(Vec::new()),
            next_handler: Cell::new(0),
        })
    }

    pub const fn id(&self) -> GestureId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.inner.borrow().recognizer.name()
    }

    // ---- handlers ----

    /// Register a handler. Handlers run in registration order.
    pub fn add_handler<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(EventType, &GestureData, &[FingerRef]) + 'static,
    {
        let id = HandlerId(self.next_handler.get());
        self.next_handler.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn remove_handler(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        match handlers.iter().position(|(h, _)| *h == id) {
            Some(index) => {
                handlers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn remove_all_handlers(&self) {
        self.handlers.borrow_mut().clear();
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Invoke every handler with the currently listened fingers.
    pub fn fire(&self, kind: EventType, data: GestureData) {
        let fingers = self.listened_fingers();
        self.deliver(Emission {
            kind,
            data,
            fingers,
        });
    }

    // ---- subscriptions ----

    pub fn is_listening(&self) -> bool {
        !self.inner.borrow().listened.is_empty()
    }

    /// Listened fingers, in subscription order.
    pub fn listened_fingers(&self) -> Vec<FingerRef> {
        self.inner.borrow().listened.clone()
    }

    pub fn is_listened_finger(&self, finger: &Finger) -> bool {
        position_of(&self.inner.borrow().listened, finger).is_some()
    }

    /// Read the recognizer, e.g. to inspect its options.
    ///
    /// Must not be called from inside a recognizer hook of the same gesture.
    pub fn with_recognizer<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.inner.borrow().recognizer)
    }

    /// Mutate the recognizer between events, e.g. to register zones.
    pub fn with_recognizer_mut<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut self.inner.borrow_mut().recognizer)
    }

    /// Run a recognizer hook and deliver whatever it fired.
    fn run(&self, hook: impl FnOnce(&mut R, &mut GestureContext<'_>)) {
        let emissions = {
            let mut inner = self.inner.borrow_mut();
            let Inner {
                recognizer,
                listened,
            } = &mut *inner;
            let observer: Weak<dyn GestureObject> = self.this.clone();
            let mut ctx = GestureContext::new(self.id, observer, listened);
            hook(recognizer, &mut ctx);
            ctx.emissions
        };
        for emission in emissions {
            self.deliver(emission);
        }
    }

    fn deliver(&self, emission: Emission) {
        let handlers: Vec<Handler> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        log::debug!(
            "gesture {} fired {:?} to {} handler(s)",
            self.name(),
            emission.kind,
            handlers.len()
        );
        for handler in handlers {
            handler(emission.kind, &emission.data, &emission.fingers);
        }
    }
}

impl<R: Recognizer> GestureObject for Gesture<R> {
    fn id(&self) -> GestureId {
        self.id
    }

    fn finger_added(&self, finger: &FingerRef, fingers: &[FingerRef]) {
        self.run(|recognizer, ctx| recognizer.on_finger_added(ctx, finger, fingers));
    }

    fn finger_updated(&self, finger: &FingerRef) {
        if !self.is_listened_finger(finger) {
            return;
        }
        self.run(|recognizer, ctx| recognizer.on_finger_update(ctx, finger));
    }

    fn finger_removed(&self, finger: &FingerRef) {
        if !self.is_listened_finger(finger) {
            return;
        }
        self.run(|recognizer, ctx| recognizer.on_finger_removed(ctx, finger));
    }

    fn advance(&self, now: f64) {
        self.run(|recognizer, ctx| recognizer.on_timer(ctx, now));
    }

    fn detach(&self) {
        self.remove_all_handlers();
        self.run(|recognizer, ctx| {
            recognizer.on_detach();
            ctx.unlisten_all();
        });
    }
}

impl<R: Recognizer + std::fmt::Debug> std::fmt::Debug for Gesture<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Gesture")
            .field("id", &self.id)
            .field("recognizer", &inner.recognizer)
            .field("listened", &inner.listened.len())
            .field("handlers", &self.handler_count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::finger::FingerId;

    /// Listens to every finger and echoes each hook as an event.
    #[derive(Debug, Default)]
    struct Echo {
        timers: usize,
        detached: bool,
    }

    impl Recognizer for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn on_finger_added(
            &mut self,
            ctx: &mut GestureContext<'_>,
            finger: &FingerRef,
            _fingers: &[FingerRef],
        ) {
            ctx.listen(finger);
            ctx.fire(EventType::Start, GestureData::Finger(Rc::clone(finger)));
        }

        fn on_finger_update(&mut self, ctx: &mut GestureContext<'_>, finger: &FingerRef) {
            ctx.fire(EventType::Move, GestureData::Finger(Rc::clone(finger)));
        }

        fn on_finger_removed(&mut self, ctx: &mut GestureContext<'_>, finger: &FingerRef) {
            ctx.fire(EventType::End, GestureData::None);
            ctx.unlisten(finger);
        }

        fn on_timer(&mut self, _ctx: &mut GestureContext<'_>, _now: f64) {
            self.timers += 1;
        }

        fn on_detach(&mut self) {
            self.detached = true;
        }
    }

    fn finger(id: u32) -> FingerRef {
        Rc::new(Finger::new(FingerId(id), 0.0, 0.0, 0.0))
    }

    fn recorder(gesture: &Gesture<Echo>) -> Rc<RefCell<Vec<(EventType, usize)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        gesture.add_handler(move |kind, _, fingers| sink.borrow_mut().push((kind, fingers.len())));
        log
    }

    #[test]
    fn test_gesture_ids_are_unique() {
        let a = Gesture::new(Echo::default());
        let b = Gesture::new(Echo::default());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), "echo");
    }

    #[test]
    fn test_dropped_gesture_id_stays_reserved_while_subscribed() {
        let f = finger(1);
        let first = Gesture::new(Echo::default());
        first.finger_added(&f, &[Rc::clone(&f)]);
        let stale = first.id();
        drop(first);

        let second = Gesture::new(Echo::default());
        assert_ne!(second.id(), stale);
        second.finger_added(&f, &[Rc::clone(&f)]);
        assert_eq!(f.subscriber_count(), 2);

        second.finger_removed(&f);
        assert_eq!(f.subscriber_count(), 1);
    }

    #[test]
    fn test_listen_registers_on_finger() {
        let gesture = Gesture::new(Echo::default());
        let f = finger(1);
        gesture.finger_added(&f, &[Rc::clone(&f)]);

        assert!(gesture.is_listening());
        assert!(gesture.is_listened_finger(&f));
        assert_eq!(f.subscriber_count(), 1);
    }

    #[test]
    fn test_unlisten_is_exact_inverse() {
        let gesture = Gesture::new(Echo::default());
        let f = finger(1);
        gesture.finger_added(&f, &[Rc::clone(&f)]);
        gesture.finger_removed(&f);

        assert!(!gesture.is_listening());
        assert_eq!(f.subscriber_count(), 0);
    }

    #[test]
    fn test_fired_events_capture_listened_fingers() {
        let gesture = Gesture::new(Echo::default());
        let log = recorder(&gesture);
        let f = finger(1);
        gesture.finger_added(&f, &[Rc::clone(&f)]);
        gesture.finger_removed(&f);

        // end was fired before the finger was unlistened
        assert_eq!(*log.borrow(), vec![(EventType::Start, 1), (EventType::End, 1)]);
    }

    #[test]
    fn test_notifications_for_unlistened_fingers_are_dropped() {
        let gesture = Gesture::new(Echo::default());
        let log = recorder(&gesture);
        let f = finger(1);
        gesture.finger_updated(&f);
        gesture.finger_removed(&f);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let gesture = Gesture::new(Echo::default());
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let order = Rc::clone(&order);
            gesture.add_handler(move |_, _, _| order.borrow_mut().push(i));
        }
        gesture.fire(EventType::Instant, GestureData::None);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_remove_handler_during_fire_skips_nothing() {
        let gesture = Gesture::new(Echo::default());
        let calls = Rc::new(Cell::new(0));

        let first_id = Rc::new(Cell::new(None));
        {
            let weak = Rc::downgrade(&gesture);
            let own_id = Rc::clone(&first_id);
            let calls = Rc::clone(&calls);
            let id = gesture.add_handler(move |_, _, _| {
                calls.set(calls.get() + 1);
                if let (Some(gesture), Some(id)) = (weak.upgrade(), own_id.get()) {
                    gesture.remove_handler(id);
                }
            });
            first_id.set(Some(id));
        }
        let second = Rc::clone(&calls);
        gesture.add_handler(move |_, _, _| second.set(second.get() + 1));

        gesture.fire(EventType::Instant, GestureData::None);
        assert_eq!(calls.get(), 2);
        assert_eq!(gesture.handler_count(), 1);

        gesture.fire(EventType::Instant, GestureData::None);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_remove_unknown_handler() {
        let gesture = Gesture::new(Echo::default());
        let id = gesture.add_handler(|_, _, _| {});
        assert!(gesture.remove_handler(id));
        assert!(!gesture.remove_handler(id));
    }

    #[test]
    fn test_handler_can_query_its_gesture() {
        let gesture = Gesture::new(Echo::default());
        let seen = Rc::new(Cell::new(false));
        {
            let weak = Rc::downgrade(&gesture);
            let seen = Rc::clone(&seen);
            gesture.add_handler(move |_, _, _| {
                let gesture = weak.upgrade().unwrap();
                seen.set(gesture.is_listening());
            });
        }
        let f = finger(1);
        gesture.finger_added(&f, &[Rc::clone(&f)]);
        assert!(seen.get());
    }

    #[test]
    fn test_detach_clears_everything() {
        let gesture = Gesture::new(Echo::default());
        recorder(&gesture);
        let f = finger(1);
        gesture.finger_added(&f, &[Rc::clone(&f)]);

        gesture.detach();
        assert_eq!(gesture.handler_count(), 0);
        assert!(!gesture.is_listening());
        assert_eq!(f.subscriber_count(), 0);
        assert!(gesture.with_recognizer(|r| r.detached));
    }

    #[test]
    fn test_advance_reaches_recognizer() {
        let gesture = Gesture::new(Echo::default());
        gesture.advance(10.0);
        gesture.advance(20.0);
        assert_eq!(gesture.with_recognizer(|r| r.timers), 2);
    }
}
