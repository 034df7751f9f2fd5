use crate::error::{ConfigError, Result};
use crate::finger::FingerRef;
use crate::gesture::{EventType, GestureContext, GestureData, Recognizer};
use crate::utils::Direction;
use serde::{Deserialize, Serialize};

/// Options of the [`Swipe`] recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeOptions {
    /// Fingers that must swipe together.
    pub nb_fingers: usize,
    /// Horizontal speed (px/ms) a finger must exceed.
    pub swipe_velocity_x: f64,
    /// Vertical speed (px/ms) a finger must exceed.
    pub swipe_velocity_y: f64,
}

impl Default for SwipeOptions {
    fn default() -> Self {
        Self {
            nb_fingers: 1,
            swipe_velocity_x: 0.6,
            swipe_velocity_y: 0.6,
        }
    }
}

impl SwipeOptions {
    pub fn validate(&self) -> Result<()> {
        if self.nb_fingers == 0 {
            return Err(ConfigError::invalid("swipe", "nb_fingers", "must be at least 1"));
        }
        if self.swipe_velocity_x < 0.0 {
            return Err(ConfigError::invalid("swipe", "swipe_velocity_x", "must not be negative"));
        }
        if self.swipe_velocity_y < 0.0 {
            return Err(ConfigError::invalid("swipe", "swipe_velocity_y", "must not be negative"));
        }
        Ok(())
    }
}

/// Payload of a recognized swipe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeData {
    /// Common direction of the swiping fingers.
    pub direction: Direction,
    /// Fastest speed (px/ms) on the axis that passed its threshold.
    pub velocity: f64,
}

/// Fast flick of one or more fingers in a common direction.
#[derive(Debug, Clone, Default)]
pub struct Swipe {
    options: SwipeOptions,
}

impl Swipe {
    /// Create the recognizer after validating its options.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range option.
    pub fn new(options: SwipeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub const fn options(&self) -> &SwipeOptions {
        &self.options
    }

    /// Evaluate the listened fingers at release time.
    fn recognize(&self, fingers: &[FingerRef]) -> Option<SwipeData> {
        let direction = fingers.first()?.delta_direction();
        let mut same_direction = true;
        let mut max_x: f64 = 0.0;
        let mut max_y: f64 = 0.0;
        for finger in fingers {
            same_direction &= finger.delta_direction() == direction;
            max_x = max_x.max(finger.velocity_x());
            max_y = max_y.max(finger.velocity_y());
        }

        let fast_x = max_x > self.options.swipe_velocity_x;
        let fast_y = max_y > self.options.swipe_velocity_y;
        if !same_direction || !(fast_x || fast_y) {
            return None;
        }
        Some(SwipeData {
            direction,
            velocity: if fast_x { max_x } else { max_y },
        })
    }
}

impl Recognizer for Swipe {
    fn name(&self) -> &'static str {
        "swipe"
    }

    fn on_finger_added(
        &mut self,
        ctx: &mut GestureContext<'_>,
        _finger: &FingerRef,
        fingers: &[FingerRef],
    ) {
        if ctx.is_listening() || fingers.len() < self.options.nb_fingers {
            return;
        }
        for finger in &fingers[..self.options.nb_fingers] {
            ctx.listen(finger);
        }
    }

    fn on_finger_removed(&mut self, ctx: &mut GestureContext<'_>, _finger: &FingerRef) {
        if let Some(data) = self.recognize(ctx.listened_fingers()) {
            ctx.fire(EventType::Instant, GestureData::Swipe(data));
        }
        ctx.unlisten_all();
    }
}
