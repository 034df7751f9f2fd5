use crate::error::{ConfigError, Result};
use crate::finger::FingerRef;
use crate::gesture::{EventType, GestureContext, GestureData, Recognizer};
use crate::utils::{fingers_angle, fingers_distance, ratio_or_identity};
use serde::{Deserialize, Serialize};

/// Options of the [`Transform`] recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Track the angle between the two fingers.
    pub rotation: bool,
    /// Track the distance between the two fingers.
    pub scale: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            rotation: true,
            scale: true,
        }
    }
}

impl TransformOptions {
    /// Rotation only.
    pub const ROTATE: Self = Self {
        rotation: true,
        scale: false,
    };

    /// Scale only.
    pub const SCALE: Self = Self {
        rotation: false,
        scale: true,
    };

    pub fn validate(&self) -> Result<()> {
        if !self.rotation && !self.scale {
            return Err(ConfigError::invalid(
                "transform",
                "rotation",
                "rotation and scale are both disabled",
            ));
        }
        Ok(())
    }
}

/// Payload of transform events. Disabled components keep their identity value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformData {
    /// Rotation since start (radians).
    pub total_rotation: f64,
    /// Rotation since the previous event (radians).
    pub delta_rotation: f64,
    /// Scale since start.
    pub total_scale: f64,
    /// Scale since the previous event.
    pub delta_scale: f64,
}

impl Default for TransformData {
    fn default() -> Self {
        Self {
            total_rotation: 0.0,
            delta_rotation: 0.0,
            total_scale: 1.0,
            delta_scale: 1.0,
        }
    }
}

/// Continuous two-finger rotation and scale.
#[derive(Debug, Clone, Default)]
pub struct Transform {
    options: TransformOptions,
    start_angle: f64,
    last_angle: f64,
    start_distance: f64,
    last_distance: f64,
    data: TransformData,
}

impl Transform {
    /// Create the recognizer after validating its options.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range option.
    pub fn new(options: TransformOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::preset(options))
    }

    fn preset(options: TransformOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Rotation only.
    #[must_use]
    pub fn rotate() -> Self {
        Self::preset(TransformOptions::ROTATE)
    }

    /// Scale only.
    #[must_use]
    pub fn scale() -> Self {
        Self::preset(TransformOptions::SCALE)
    }

    pub const fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Payload of the last fired event.
    pub const fn data(&self) -> TransformData {
        self.data
    }

    fn pair(ctx: &GestureContext<'_>) -> Option<(f64, f64)> {
        match ctx.listened_fingers() {
            [first, second, ..] => Some((
                fingers_angle(first, second),
                fingers_distance(first, second),
            )),
            _ => None,
        }
    }
}

impl Recognizer for Transform {
    fn name(&self) -> &'static str {
        match (self.options.rotation, self.options.scale) {
            (true, false) => "rotate",
            (false, true) => "scale",
            _ => "transform",
        }
    }

    fn on_finger_added(
        &mut self,
        ctx: &mut GestureContext<'_>,
        _finger: &FingerRef,
        fingers: &[FingerRef],
    ) {
        if ctx.is_listening() || fingers.len() < 2 {
            return;
        }
        ctx.listen(&fingers[0]);
        ctx.listen(&fingers[1]);
        let Some((angle, distance)) = Self::pair(ctx) else {
            return;
        };

        if self.options.rotation {
            self.start_angle = angle;
            self.last_angle = angle;
            self.data.total_rotation = 0.0;
            self.data.delta_rotation = 0.0;
        }
        if self.options.scale {
            self.start_distance = distance;
            self.last_distance = distance;
            self.data.total_scale = 1.0;
            self.data.delta_scale = 1.0;
        }
        ctx.fire(EventType::Start, GestureData::Transform(self.data));
    }

    fn on_finger_update(&mut self, ctx: &mut GestureContext<'_>, _finger: &FingerRef) {
        let Some((angle, distance)) = Self::pair(ctx) else {
            return;
        };

        if self.options.rotation {
            self.data.total_rotation = self.start_angle - angle;
            self.data.delta_rotation = self.last_angle - angle;
            self.last_angle = angle;
        }
        if self.options.scale {
            self.data.total_scale = ratio_or_identity(distance, self.start_distance);
            self.data.delta_scale = ratio_or_identity(distance, self.last_distance);
            self.last_distance = distance;
        }
        ctx.fire(EventType::Move, GestureData::Transform(self.data));
    }

    fn on_finger_removed(&mut self, ctx: &mut GestureContext<'_>, _finger: &FingerRef) {
        ctx.fire(EventType::End, GestureData::Transform(self.data));
        ctx.unlisten_all();
    }
}
