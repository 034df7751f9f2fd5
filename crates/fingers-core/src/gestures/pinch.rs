use crate::error::{ConfigError, Result};
use crate::finger::FingerRef;
use crate::gesture::{EventType, GestureContext, GestureData, Recognizer};
use crate::utils::{fingers_distance, Grow};
use serde::{Deserialize, Serialize};

/// Options of the [`Pinch`] recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinchOptions {
    /// Scale at or below which a pinch-in is reported.
    pub pinch_in_detect: f64,
    /// Scale at or above which a pinch-out is reported.
    pub pinch_out_detect: f64,
}

impl Default for PinchOptions {
    fn default() -> Self {
        Self {
            pinch_in_detect: 0.6,
            pinch_out_detect: 1.4,
        }
    }
}

impl PinchOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.pinch_in_detect) {
            return Err(ConfigError::invalid(
                "pinch",
                "pinch_in_detect",
                format!("{} is not in [0, 1)", self.pinch_in_detect),
            ));
        }
        if self.pinch_out_detect <= 1.0 || self.pinch_out_detect.is_nan() {
            return Err(ConfigError::invalid(
                "pinch",
                "pinch_out_detect",
                format!("{} is not above 1", self.pinch_out_detect),
            ));
        }
        Ok(())
    }
}

/// Payload of a recognized pinch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinchData {
    /// Whether the fingers moved apart or closer.
    pub grow: Grow,
    /// End distance over start distance.
    pub scale: f64,
}

/// Two-finger pinch, decided once when either finger lifts.
#[derive(Debug, Clone, Default)]
pub struct Pinch {
    options: PinchOptions,
    start_distance: f64,
}

impl Pinch {
    /// Create the recognizer after validating its options.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range option.
    pub fn new(options: PinchOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            start_distance: 0.0,
        })
    }

    pub const fn options(&self) -> &PinchOptions {
        &self.options
    }

    fn current_distance(ctx: &GestureContext<'_>) -> Option<f64> {
        match ctx.listened_fingers() {
            [first, second, ..] => Some(fingers_distance(first, second)),
            _ => None,
        }
    }
}

impl Recognizer for Pinch {
    fn name(&self) -> &'static str {
        "pinch"
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
        self.start_distance = Self::current_distance(ctx).unwrap_or_default();
    }

    fn on_finger_removed(&mut self, ctx: &mut GestureContext<'_>, _finger: &FingerRef) {
        if let Some(end_distance) = Self::current_distance(ctx) {
            let scale = end_distance / self.start_distance;
            let detected =
                scale <= self.options.pinch_in_detect || scale >= self.options.pinch_out_detect;
            if scale.is_finite() && detected {
                let grow = if scale > 1.0 { Grow::Out } else { Grow::In };
                ctx.fire(EventType::Instant, GestureData::Pinch(PinchData { grow, scale }));
            }
        }
        ctx.unlisten_all();
    }
}
