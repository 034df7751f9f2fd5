//! Raw input primitives delivered by the host platform.

use crate::finger::FingerId;
use serde::{Deserialize, Serialize};

/// Mouse button that starts a contact.
pub const PRIMARY_BUTTON: u16 = 0;

/// Capabilities of the surface an instance is attached to.
pub trait InputSurface {
    /// Whether the platform delivers touch events.
    fn has_touch_events(&self) -> bool;

    /// Whether the platform is a phone or tablet.
    fn is_mobile(&self) -> bool {
        false
    }
}

/// Static surface description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceCapabilities {
    /// The surface emits touch events.
    pub touch: bool,
    /// The surface is a mobile device.
    pub mobile: bool,
}

impl SurfaceCapabilities {
    /// A touch-screen phone or tablet.
    pub const TOUCH_DEVICE: Self = Self {
        touch: true,
        mobile: true,
    };

    /// A desktop with a mouse.
    pub const DESKTOP: Self = Self {
        touch: false,
        mobile: false,
    };
}

impl InputSurface for SurfaceCapabilities {
    fn has_touch_events(&self) -> bool {
        self.touch
    }

    fn is_mobile(&self) -> bool {
        self.mobile
    }
}

/// Which family of primitives an instance consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Touch start, move, end and cancel primitives.
    Touch,
    /// Mouse down, move and up primitives.
    Mouse,
}

impl InputMode {
    /// Touch only on mobile devices with touch events, mouse otherwise.
    pub fn detect<S: InputSurface + ?Sized>(surface: &S) -> Self {
        if surface.has_touch_events() && surface.is_mobile() {
            Self::Touch
        } else {
            Self::Mouse
        }
    }
}

/// One changed touch point of a touch primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Platform touch identifier.
    pub id: FingerId,
    /// Page x coordinate.
    pub x: f64,
    /// Page y coordinate.
    pub y: f64,
}

impl Contact {
    /// Create a contact from a raw touch identifier.
    #[must_use]
    pub const fn new(id: u32, x: f64, y: f64) -> Self {
        Self {
            id: FingerId(id),
            x,
            y,
        }
    }
}

/// A raw platform event. Touch variants carry only the changed touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawInput {
    /// Contacts went down.
    TouchStart { timestamp: f64, touches: Vec<Contact> },
    /// Contacts moved.
    TouchMove { timestamp: f64, touches: Vec<Contact> },
    /// Contacts were lifted.
    TouchEnd { timestamp: f64, touches: Vec<Contact> },
    /// The platform interrupted the contacts.
    TouchCancel { timestamp: f64, touches: Vec<Contact> },
    /// A mouse button was pressed.
    MouseDown { timestamp: f64, button: u16, x: f64, y: f64 },
    /// The mouse moved.
    MouseMove { timestamp: f64, button: u16, x: f64, y: f64 },
    /// A mouse button was released.
    MouseUp { timestamp: f64, button: u16, x: f64, y: f64 },
}

impl RawInput {
    /// Event time (ms).
    pub const fn timestamp(&self) -> f64 {
        match self {
            Self::TouchStart { timestamp, .. }
            | Self::TouchMove { timestamp, .. }
            | Self::TouchEnd { timestamp, .. }
            | Self::TouchCancel { timestamp, .. }
            | Self::MouseDown { timestamp, .. }
            | Self::MouseMove { timestamp, .. }
            | Self::MouseUp { timestamp, .. } => *timestamp,
        }
    }

    /// The input family this primitive belongs to.
    pub const fn mode(&self) -> InputMode {
        match self {
            Self::TouchStart { .. }
            | Self::TouchMove { .. }
            | Self::TouchEnd { .. }
            | Self::TouchCancel { .. } => InputMode::Touch,
            Self::MouseDown { .. } | Self::MouseMove { .. } | Self::MouseUp { .. } => {
                InputMode::Mouse
            }
        }
    }
}

/// What the host should do with the native event after handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventDisposition {
    /// The instance did not consume the event.
    #[default]
    Ignored,
    /// Consumed; native behavior may proceed.
    Handled,
    /// Consumed; suppress native behavior such as scrolling.
    PreventDefault,
}
