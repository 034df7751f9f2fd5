use crate::finger::FingerRef;
use crate::gesture::{EventType, GestureContext, GestureData, Recognizer};

/// Single-finger drag: `start` on press, `move` per update, `end` on release.
#[derive(Debug, Clone, Copy, Default)]
pub struct Drag;

impl Drag {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Recognizer for Drag {
    fn name(&self) -> &'static str {
        "drag"
    }

    fn on_finger_added(
        &mut self,
        ctx: &mut GestureContext<'_>,
        finger: &FingerRef,
        _fingers: &[FingerRef],
    ) {
        if !ctx.is_listening() {
            ctx.listen(finger);
            ctx.fire(EventType::Start, GestureData::None);
        }
    }

    fn on_finger_update(&mut self, ctx: &mut GestureContext<'_>, _finger: &FingerRef) {
        ctx.fire(EventType::Move, GestureData::None);
    }

    fn on_finger_removed(&mut self, ctx: &mut GestureContext<'_>, _finger: &FingerRef) {
        ctx.fire(EventType::End, GestureData::None);
        ctx.unlisten_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gestures::testing::{slide, finger, kinds, lift, press, recorded};

    #[test]
    fn test_drag_lifecycle() {
        let (gesture, log) = recorded(Drag::new());
        let mut down = Vec::new();
        let f = finger(1, 0.0, 0.0, 0.0);

        press(&gesture, &mut down, &f);
        slide(&f, 10.0, 5.0, 0.0);
        slide(&f, 20.0, 9.0, 0.0);
        lift(&f, 30.0);

        assert_eq!(
            kinds(&log),
            vec![EventType::Start, EventType::Move, EventType::Move, EventType::End]
        );
        assert!(!gesture.is_listening());
    }

    #[test]
    fn test_drag_ignores_second_finger() {
        let (gesture, log) = recorded(Drag::new());
        let mut down = Vec::new();
        let first = finger(1, 0.0, 0.0, 0.0);
        let second = finger(2, 0.0, 50.0, 50.0);

        press(&gesture, &mut down, &first);
        press(&gesture, &mut down, &second);
        slide(&second, 10.0, 60.0, 50.0);

        assert_eq!(kinds(&log), vec![EventType::Start]);
        assert_eq!(gesture.listened_fingers().len(), 1);
    }
}
