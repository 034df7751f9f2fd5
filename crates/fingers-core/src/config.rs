//! Declarative gesture configuration.
//!
//! ```yaml
//! input_mode: touch
//! gestures:
//!   - kind: tap
//!     nb_tap_min: 2
//!   - kind: rotate
//!   - kind: zone_hover
//!     zones:
//!       - { left: 0, top: 0, right: 100, bottom: 100 }
//! ```

use crate::error::Result;
use crate::gesture::Recognizer;
use crate::gestures::{
    Drag, Hold, HoldOptions, Pinch, PinchOptions, Raw, RawOptions, Swipe, SwipeOptions, Tap,
    TapOptions, Transform, TransformOptions, ZoneHover, ZoneHoverOptions,
};
use crate::input::InputMode;
use serde::{Deserialize, Serialize};

/// A gesture together with its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureKind {
    /// Single-finger drag.
    Drag,
    /// Long press.
    Hold(HoldOptions),
    /// Two-finger pinch.
    Pinch(PinchOptions),
    /// Raw finger events.
    Raw(RawOptions),
    /// Fast flick.
    Swipe(SwipeOptions),
    /// Tap series.
    Tap(TapOptions),
    /// Two-finger rotation and scale.
    Transform(TransformOptions),
    /// Transform with rotation only.
    Rotate,
    /// Transform with scale only.
    Scale,
    /// Zone enter/leave.
    ZoneHover(ZoneHoverOptions),
}

impl GestureKind {
    /// Name of the recognizer this kind builds.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Drag => "drag",
            Self::Hold(_) => "hold",
            Self::Pinch(_) => "pinch",
            Self::Raw(_) => "raw",
            Self::Swipe(_) => "swipe",
            Self::Tap(_) => "tap",
            Self::Transform(_) => "transform",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
            Self::ZoneHover(_) => "zone_hover",
        }
    }

    /// Check every option value.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range option.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Drag | Self::Rotate | Self::Scale => Ok(()),
            Self::Hold(options) => options.validate(),
            Self::Pinch(options) => options.validate(),
            Self::Raw(options) => options.validate(),
            Self::Swipe(options) => options.validate(),
            Self::Tap(options) => options.validate(),
            Self::Transform(options) => options.validate(),
            Self::ZoneHover(options) => options.validate(),
        }
    }

    /// Instantiate the recognizer.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range option.
    pub fn build(self) -> Result<Box<dyn Recognizer>> {
        Ok(match self {
            Self::Drag => Box::new(Drag::new()),
            Self::Hold(options) => Box::new(Hold::new(options)?),
            Self::Pinch(options) => Box::new(Pinch::new(options)?),
            Self::Raw(options) => Box::new(Raw::new(options)?),
            Self::Swipe(options) => Box::new(Swipe::new(options)?),
            Self::Tap(options) => Box::new(Tap::new(options)?),
            Self::Transform(options) => Box::new(Transform::new(options)?),
            Self::Rotate => Box::new(Transform::rotate()),
            Self::Scale => Box::new(Transform::scale()),
            Self::ZoneHover(options) => Box::new(ZoneHover::new(options)?),
        })
    }
}

/// Configuration of one instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Forced input mode; detected from the surface when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_mode: Option<InputMode>,
    /// Gestures to register, in order.
    #[serde(default)]
    pub gestures: Vec<GestureKind>,
}

impl InstanceConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or an option is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or an option is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// # Errors
    ///
    /// Returns the first invalid option of any gesture.
    pub fn validate(&self) -> Result<()> {
        self.gestures.iter().try_for_each(GestureKind::validate)
    }
}
