//! Multi-touch and mouse gesture recognition.
//!
//! This crate turns raw pointer input into high-level gestures:
//! - Contacts: [`Finger`] with memoized kinematics ([`Metric`])
//! - Listener instances: [`Instance`] fed with [`RawInput`]
//! - Gestures: [`Gesture`] hosting a [`Recognizer`] such as [`Tap`],
//!   [`Swipe`], [`Pinch`], [`Hold`], [`Drag`], [`Raw`], [`Transform`] or
//!   [`ZoneHover`]
//! - Configuration: [`InstanceConfig`] and [`GestureKind`] from YAML or JSON
//!
//! Everything is single-threaded and synchronous. Time only advances through
//! input timestamps and [`Instance::advance`].
//!
//! ```
//! use fingers_core::{
//!     Contact, EventType, FingerRegistry, GestureData, Instance, InputMode, ManualClock,
//!     RawInput, Tap,
//! };
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let clock = Rc::new(ManualClock::new(0.0));
//! let mut instance = Instance::with_mode(InputMode::Touch, FingerRegistry::new(), clock);
//! let tap = instance.add_gesture(Tap::default());
//!
//! let taps = Rc::new(Cell::new(0));
//! let seen = Rc::clone(&taps);
//! tap.add_handler(move |kind, data, _| {
//!     if let (EventType::Instant, GestureData::Tap(tap)) = (kind, data) {
//!         seen.set(tap.nb_tap);
//!     }
//! });
//!
//! let touches = vec![Contact::new(1, 10.0, 10.0)];
//! instance.handle(&RawInput::TouchStart { timestamp: 0.0, touches: touches.clone() });
//! instance.handle(&RawInput::TouchEnd { timestamp: 80.0, touches });
//! assert_eq!(taps.get(), 1);
//! ```

mod clock;
mod config;
mod error;
mod finger;
mod gesture;
pub mod gestures;
mod input;
mod instance;
mod metrics;
mod position;
mod registry;
mod timer;
pub mod utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{GestureKind, InstanceConfig};
pub use error::{ConfigError, Result};
pub use finger::{Finger, FingerId, FingerRef, FingerSnapshot, FingerState, INACTIVITY_THRESHOLD_MS};
pub use gesture::{
    DynGestureHandle, EventType, Gesture, GestureContext, GestureData, GestureHandle, GestureId,
    Handler, HandlerId, Recognizer,
};
pub use gestures::{
    Drag, Hold, HoldOptions, Pinch, PinchData, PinchOptions, Raw, RawOptions, Swipe, SwipeData,
    SwipeOptions, Tap, TapData, TapOptions, Transform, TransformData, TransformOptions, Zone,
    ZoneData, ZoneHover, ZoneHoverOptions, ZoneId, ZoneTransition,
};
pub use input::{
    Contact, EventDisposition, InputMode, InputSurface, RawInput, SurfaceCapabilities,
    PRIMARY_BUTTON,
};
pub use instance::Instance;
pub use metrics::Metric;
pub use position::Position;
pub use registry::FingerRegistry;
pub use timer::OneShotTimer;
pub use utils::{Direction, Grow};
