//! Scripted multi-gesture scenarios.

#![allow(clippy::unwrap_used)]

use fingers_core::{
    Direction, Drag, EventDisposition, EventType, FingerRegistry, GestureData, Hold, InputMode,
    InstanceConfig, Pinch, Raw, Swipe, Tap, TapOptions, Transform, Zone, ZoneHover,
    ZoneTransition,
};
use fingers_test::{Harness, Recorder};
use proptest::prelude::*;
use std::collections::BTreeSet;

#[test]
fn test_double_tap_then_reset() {
    let mut harness = Harness::touch();
    let recorder = Recorder::new();
    let tap = Tap::new(TapOptions {
        nb_tap_min: 2,
        ..TapOptions::default()
    })
    .unwrap();
    recorder.attach(&harness.add_gesture(tap));

    harness.tap(1, 10.0, 10.0, 50.0).wait(100.0).tap(1, 10.0, 10.0, 50.0);
    assert_eq!(recorder.len(), 1);

    harness.wait(600.0).tap(1, 10.0, 10.0, 50.0);
    assert_eq!(recorder.len(), 1);
}

#[test]
fn test_swipe_right_via_script() {
    let mut harness = Harness::touch();
    let recorder = Recorder::new();
    recorder.attach(&harness.add_gesture(Swipe::default()));

    harness.swipe(1, (0.0, 100.0), (200.0, 100.0), 80.0, 8);

    let events = recorder.events();
    assert_eq!(events.len(), 1);
    match &events[0].data {
        GestureData::Swipe(data) => {
            assert_eq!(data.direction, Direction::Right);
            assert!((data.velocity - 2.5).abs() < 1e-9);
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_slow_drag_is_not_a_swipe_or_tap() {
    let mut harness = Harness::touch();
    let recorder = Recorder::new();
    recorder.attach(&harness.add_gesture(Swipe::default()));
    recorder.attach(&harness.add_gesture(Tap::default()));
    recorder.attach(&harness.add_gesture(Drag::new()));

    harness.swipe(1, (0.0, 0.0), (100.0, 0.0), 1000.0, 10);

    assert!(recorder.of("swipe").is_empty());
    assert!(recorder.of("tap").is_empty());
    let drag = recorder.of("drag");
    assert_eq!(drag.first().map(|e| e.kind), Some(EventType::Start));
    assert_eq!(drag.last().map(|e| e.kind), Some(EventType::End));
    assert_eq!(drag.len(), 12);
}

#[test]
fn test_pinch_and_transform_together() {
    let mut harness = Harness::touch();
    let recorder = Recorder::new();
    recorder.attach(&harness.add_gesture(Pinch::default()));
    recorder.attach(&harness.add_gesture(Transform::scale()));

    harness
        .touches_start(&[(1, 0.0, 0.0), (2, 100.0, 0.0)])
        .wait(16.0)
        .touch_move(2, 200.0, 0.0)
        .wait(16.0)
        .touch_end(2)
        .touch_end(1);

    let pinch = recorder.of("pinch");
    assert_eq!(pinch.len(), 1);
    match pinch[0].data {
        GestureData::Pinch(data) => assert!((data.scale - 2.0).abs() < 1e-12),
        ref other => panic!("unexpected payload {other:?}"),
    }
    let scale_kinds: Vec<EventType> = recorder.of("scale").iter().map(|e| e.kind).collect();
    assert_eq!(scale_kinds, vec![EventType::Start, EventType::Move, EventType::End]);
    harness.assert_finger_count(0);
}

#[test]
fn test_hold_on_harness_clock() {
    let mut harness = Harness::touch();
    let recorder = Recorder::new();
    recorder.attach(&harness.add_gesture(Hold::default()));

    harness.touch_start(1, 0.0, 0.0).wait(300.0);
    assert!(recorder.is_empty());
    harness.wait(300.0);
    assert_eq!(recorder.kinds(), vec![EventType::Instant]);
    harness.touch_end(1);
    assert_eq!(recorder.len(), 1);
}

#[test]
fn test_zone_hover_enter_leave_release() {
    let mut harness = Harness::touch();
    let zones = harness.add_gesture(ZoneHover::default());
    zones.add_zone(Zone::new(0.0, 0.0, 100.0, 100.0));
    let recorder = Recorder::new();
    recorder.attach(&zones);

    harness
        .touch_start(1, 200.0, 200.0)
        .touch_move(1, 50.0, 50.0)
        .touch_move(1, 60.0, 60.0);
    assert_eq!(zones.hovered_zones().len(), 1);
    harness.touch_end(1);

    let transitions: Vec<ZoneTransition> = recorder
        .events()
        .iter()
        .filter_map(|e| match &e.data {
            GestureData::Zone(zone) => Some(zone.transition),
            _ => None,
        })
        .collect();
    assert_eq!(transitions, vec![ZoneTransition::Enter, ZoneTransition::Leave]);
}

#[test]
fn test_nested_instances_share_fingers() {
    let registry = FingerRegistry::new();
    let mut outer = Harness::with_registry(InputMode::Touch, &registry);
    let mut inner = Harness::with_registry(InputMode::Touch, &registry);
    let recorder = Recorder::new();
    recorder.attach(&outer.add_gesture(Raw::default()));
    recorder.attach(&inner.add_gesture(Raw::default()));

    inner.touch_start(5, 0.0, 0.0);
    outer.touch_start(5, 0.0, 0.0);
    assert_eq!(registry.len(), 1);

    inner.wait(10.0).touch_move(5, 30.0, 0.0);
    // one finger, two listening gestures
    assert_eq!(recorder.count(EventType::Move), 2);

    inner.touch_end(5);
    assert_eq!(recorder.count(EventType::End), 0);
    outer.touch_end(5);
    assert_eq!(recorder.count(EventType::End), 2);
    assert!(registry.is_empty());
}

#[test]
fn test_mouse_session() {
    let mut harness = Harness::mouse();
    let recorder = Recorder::new();
    recorder.attach(&harness.add_gesture(Drag::new()));

    harness
        .mouse_down_with(2, 0.0, 0.0)
        .mouse_down(0.0, 0.0)
        .wait(10.0)
        .mouse_move(10.0, 0.0)
        .mouse_up();
    assert_eq!(
        harness.dispositions(),
        &[
            EventDisposition::Ignored,
            EventDisposition::PreventDefault,
            EventDisposition::Handled,
            EventDisposition::Handled,
        ]
    );
    assert_eq!(recorder.kinds(), vec![EventType::Start, EventType::Move, EventType::End]);
}

#[test]
fn test_touch_cancel_ends_everything() {
    let mut harness = Harness::touch();
    let recorder = Recorder::new();
    recorder.attach(&harness.add_gesture(Raw::default()));

    harness.touches_start(&[(1, 0.0, 0.0), (2, 10.0, 0.0), (3, 20.0, 0.0)]);
    harness.touch_cancel(2);
    harness.assert_finger_count(0);
    assert_eq!(recorder.count(EventType::End), 3);
}

#[test]
fn test_config_driven_harness() {
    let config = InstanceConfig::from_yaml(
        "gestures:\n  - kind: drag\n  - kind: zone_hover\n    zones:\n      - { left: 0, top: 0, right: 10, bottom: 10 }\n",
    )
    .unwrap();
    let (mut harness, handles) = Harness::from_config(&config, InputMode::Touch).unwrap();
    let recorder = Recorder::new();
    for handle in &handles {
        recorder.attach(handle);
    }

    harness.touch_start(1, 5.0, 5.0).touch_move(1, 50.0, 5.0).touch_end(1);
    assert_eq!(recorder.of("drag").len(), 3);
    assert_eq!(recorder.of("zone_hover").len(), 2);
    assert!(recorder.to_json().unwrap().contains("\"enter\""));
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Down(u32),
    Move(u32, f64),
    Up(u32),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1u32..5).prop_map(Step::Down),
        (1u32..5, -50.0f64..50.0).prop_map(|(id, x)| Step::Move(id, x)),
        (1u32..5).prop_map(Step::Up),
    ]
}

proptest! {
    #[test]
    fn prop_raw_starts_and_ends_balance(steps in prop::collection::vec(step(), 1..40)) {
        let mut harness = Harness::touch();
        let recorder = Recorder::new();
        recorder.attach(&harness.add_gesture(Raw::default()));

        let mut down = BTreeSet::new();
        let mut starts = 0;
        let mut ends = 0;
        for step in steps {
            harness.wait(10.0);
            match step {
                Step::Down(id) => {
                    harness.touch_start(id, 0.0, 0.0);
                    if down.insert(id) {
                        starts += 1;
                    }
                }
                Step::Move(id, x) => {
                    harness.touch_move(id, x, 0.0);
                }
                Step::Up(id) => {
                    harness.touch_end(id);
                    if down.remove(&id) {
                        ends += 1;
                    }
                }
            }
            prop_assert_eq!(harness.instance().fingers().len(), down.len());
        }

        prop_assert_eq!(recorder.count(EventType::Start), starts);
        prop_assert_eq!(recorder.count(EventType::End), ends);
    }
}
