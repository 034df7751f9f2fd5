//! Test harness driving an instance with scripted input.

use fingers_core::{
    Clock, Contact, DynGestureHandle, EventDisposition, FingerId, FingerRegistry, GestureHandle,
    InputMode, Instance, InstanceConfig, ManualClock, RawInput, Recognizer, SurfaceCapabilities,
    PRIMARY_BUTTON,
};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Drives one [`Instance`] with synthetic input on a manual clock.
///
/// Every primitive is stamped with the harness clock, so `wait` is the only
/// way time passes.
pub struct Harness {
    instance: Instance,
    clock: Rc<ManualClock>,
    /// Inputs waiting to be processed.
    queue: VecDeque<RawInput>,
    /// Last known position of each contact.
    positions: HashMap<u32, (f64, f64)>,
    dispositions: Vec<EventDisposition>,
}

impl Harness {
    /// Touch harness on a fresh registry.
    pub fn touch() -> Self {
        Self::with_registry(InputMode::Touch, &FingerRegistry::new())
    }

    /// Mouse harness on a fresh registry.
    pub fn mouse() -> Self {
        Self::with_registry(InputMode::Mouse, &FingerRegistry::new())
    }

    /// Harness sharing `registry` with other harnesses.
    pub fn with_registry(mode: InputMode, registry: &FingerRegistry) -> Self {
        let clock = Rc::new(ManualClock::new(0.0));
        let instance = Instance::with_mode(mode, registry.clone(), clock.clone());
        Self::from_parts(instance, clock)
    }

    /// Harness whose instance and gestures come from configuration.
    ///
    /// # Errors
    ///
    /// Returns the configuration error, if any.
    pub fn from_config(
        config: &InstanceConfig,
        default_mode: InputMode,
    ) -> fingers_core::Result<(Self, Vec<DynGestureHandle>)> {
        let clock = Rc::new(ManualClock::new(0.0));
        let config = InstanceConfig {
            input_mode: config.input_mode.or(Some(default_mode)),
            gestures: config.gestures.clone(),
        };
        let (instance, handles) = Instance::from_config(
            &SurfaceCapabilities::DESKTOP,
            FingerRegistry::new(),
            clock.clone(),
            &config,
        )?;
        Ok((Self::from_parts(instance, clock), handles))
    }

    fn from_parts(instance: Instance, clock: Rc<ManualClock>) -> Self {
        Self {
            instance,
            clock,
            queue: VecDeque::new(),
            positions: HashMap::new(),
            dispositions: Vec::new(),
        }
    }

    // === Accessors ===

    pub const fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn instance_mut(&mut self) -> &mut Instance {
        &mut self.instance
    }

    pub fn registry(&self) -> &FingerRegistry {
        self.instance.registry()
    }

    pub fn add_gesture<R: Recognizer>(&mut self, recognizer: R) -> GestureHandle<R> {
        self.instance.add_gesture(recognizer)
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Dispositions of every processed input, in order.
    pub fn dispositions(&self) -> &[EventDisposition] {
        &self.dispositions
    }

    pub fn last_disposition(&self) -> Option<EventDisposition> {
        self.dispositions.last().copied()
    }

    // === Time ===

    /// Let `ms` milliseconds pass, running due timers.
    pub fn wait(&mut self, ms: f64) -> &mut Self {
        let now = self.clock.advance(ms);
        self.instance.advance(now);
        self
    }

    /// Jump to absolute time `t` without running timers.
    pub fn at(&mut self, t: f64) -> &mut Self {
        self.clock.set(t);
        self
    }

    // === Touch ===

    pub fn touch_start(&mut self, id: u32, x: f64, y: f64) -> &mut Self {
        self.touches_start(&[(id, x, y)])
    }

    /// Several contacts going down in one primitive.
    pub fn touches_start(&mut self, contacts: &[(u32, f64, f64)]) -> &mut Self {
        let touches = self.contacts(contacts);
        self.push(RawInput::TouchStart {
            timestamp: self.now(),
            touches,
        })
    }

    pub fn touch_move(&mut self, id: u32, x: f64, y: f64) -> &mut Self {
        self.touches_move(&[(id, x, y)])
    }

    pub fn touches_move(&mut self, contacts: &[(u32, f64, f64)]) -> &mut Self {
        let touches = self.contacts(contacts);
        self.push(RawInput::TouchMove {
            timestamp: self.now(),
            touches,
        })
    }

    /// Lift a contact at its last known position.
    pub fn touch_end(&mut self, id: u32) -> &mut Self {
        let touches = vec![self.last_contact(id)];
        self.positions.remove(&id);
        self.push(RawInput::TouchEnd {
            timestamp: self.now(),
            touches,
        })
    }

    pub fn touch_cancel(&mut self, id: u32) -> &mut Self {
        let touches = vec![self.last_contact(id)];
        self.push(RawInput::TouchCancel {
            timestamp: self.now(),
            touches,
        })
    }

    // === Mouse ===

    pub fn mouse_down(&mut self, x: f64, y: f64) -> &mut Self {
        self.mouse_down_with(PRIMARY_BUTTON, x, y)
    }

    pub fn mouse_down_with(&mut self, button: u16, x: f64, y: f64) -> &mut Self {
        self.positions.insert(u32::from(button), (x, y));
        self.push(RawInput::MouseDown {
            timestamp: self.now(),
            button,
            x,
            y,
        })
    }

    pub fn mouse_move(&mut self, x: f64, y: f64) -> &mut Self {
        self.positions.insert(FingerId::MOUSE_PRIMARY.0, (x, y));
        self.push(RawInput::MouseMove {
            timestamp: self.now(),
            button: PRIMARY_BUTTON,
            x,
            y,
        })
    }

    pub fn mouse_up(&mut self) -> &mut Self {
        let (x, y) = self
            .positions
            .remove(&FingerId::MOUSE_PRIMARY.0)
            .unwrap_or_default();
        self.push(RawInput::MouseUp {
            timestamp: self.now(),
            button: PRIMARY_BUTTON,
            x,
            y,
        })
    }

    // === Scripted gestures ===

    /// Press and release in place after `duration` ms.
    pub fn tap(&mut self, id: u32, x: f64, y: f64, duration: f64) -> &mut Self {
        self.touch_start(id, x, y).wait(duration).touch_end(id)
    }

    /// Move a contact in a straight line in `steps` equal moves over
    /// `duration` ms, then lift it.
    pub fn swipe(
        &mut self,
        id: u32,
        from: (f64, f64),
        to: (f64, f64),
        duration: f64,
        steps: u32,
    ) -> &mut Self {
        let steps = steps.max(1);
        let dt = duration / f64::from(steps);
        self.touch_start(id, from.0, from.1);
        for i in 1..=steps {
            let k = f64::from(i) / f64::from(steps);
            self.wait(dt).touch_move(
                id,
                from.0 + (to.0 - from.0) * k,
                from.1 + (to.1 - from.1) * k,
            );
        }
        self.touch_end(id)
    }

    /// Process recorded primitives as-is, moving the clock to each timestamp
    /// first.
    pub fn replay(&mut self, inputs: impl IntoIterator<Item = RawInput>) -> &mut Self {
        for input in inputs {
            self.clock.set(input.timestamp());
            self.push(input);
        }
        self
    }

    // === Assertions ===

    /// Assert the number of fingers down on the instance.
    ///
    /// # Panics
    ///
    /// Panics if the count differs.
    pub fn assert_finger_count(&self, expected: usize) -> &Self {
        let actual = self.instance.fingers().len();
        assert_eq!(actual, expected, "expected {expected} finger(s), found {actual}");
        self
    }

    // === Internals ===

    fn contacts(&mut self, contacts: &[(u32, f64, f64)]) -> Vec<Contact> {
        contacts
            .iter()
            .map(|&(id, x, y)| {
                self.positions.insert(id, (x, y));
                Contact::new(id, x, y)
            })
            .collect()
    }

    fn last_contact(&self, id: u32) -> Contact {
        let (x, y) = self.positions.get(&id).copied().unwrap_or_default();
        Contact::new(id, x, y)
    }

    fn push(&mut self, input: RawInput) -> &mut Self {
        self.queue.push_back(input);
        self.process_events();
        self
    }

    fn process_events(&mut self) {
        while let Some(input) = self.queue.pop_front() {
            let disposition = self.instance.handle(&input);
            self.dispositions.push(disposition);
        }
    }
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("instance", &self.instance)
            .field("now", &self.now())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fingers_core::{Drag, Tap};

    #[test]
    fn test_harness_stamps_inputs_with_clock() {
        let mut harness = Harness::touch();
        harness.wait(40.0).touch_start(1, 5.0, 5.0);
        let finger = harness.instance().fingers()[0].clone();
        assert_eq!(finger.time(), 40.0);

        harness.wait(10.0).touch_move(1, 8.0, 5.0);
        assert_eq!(finger.time(), 50.0);
        harness.touch_end(1).assert_finger_count(0);
    }

    #[test]
    fn test_harness_dispositions() {
        let mut harness = Harness::mouse();
        harness.add_gesture(Drag::new());
        harness.mouse_down(0.0, 0.0).mouse_move(4.0, 0.0).mouse_up();
        assert_eq!(
            harness.dispositions(),
            &[
                EventDisposition::PreventDefault,
                EventDisposition::Handled,
                EventDisposition::Handled
            ]
        );
    }

    #[test]
    fn test_harness_swipe_script() {
        let mut harness = Harness::touch();
        harness.swipe(1, (0.0, 0.0), (100.0, 0.0), 100.0, 4);
        assert_eq!(harness.now(), 100.0);
        assert_eq!(harness.dispositions().len(), 6);
        assert!(harness.registry().is_empty());
    }

    #[test]
    fn test_harness_replay_moves_clock() {
        let mut harness = Harness::touch();
        let tap = harness.add_gesture(Tap::default());
        harness.replay(vec![
            RawInput::TouchStart {
                timestamp: 1000.0,
                touches: vec![Contact::new(2, 1.0, 1.0)],
            },
            RawInput::TouchEnd {
                timestamp: 1050.0,
                touches: vec![Contact::new(2, 1.0, 1.0)],
            },
        ]);
        assert_eq!(harness.now(), 1050.0);
        assert_eq!(tap.with_recognizer(Tap::data).nb_tap, 1);
    }
}
