use crate::error::{ConfigError, Result};
use crate::finger::FingerRef;
use crate::gesture::{EventType, GestureContext, GestureData, Recognizer};
use serde::{Deserialize, Serialize};

/// Options of the [`Tap`] recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapOptions {
    /// Fingers that must tap together.
    pub nb_fingers: usize,
    /// Fewest consecutive taps reported.
    pub nb_tap_min: u32,
    /// Most consecutive taps reported, `None` for unbounded.
    pub nb_tap_max: Option<u32>,
    /// Maximum press duration, and maximum gap between taps of a series (ms).
    pub tap_interval: f64,
    /// Movement (px) beyond which a press is not a tap, `None` for unbounded.
    pub max_distance_moving: Option<f64>,
}

impl Default for TapOptions {
    fn default() -> Self {
        Self {
            nb_fingers: 1,
            nb_tap_min: 0,
            nb_tap_max: None,
            tap_interval: 400.0,
            max_distance_moving: None,
        }
    }
}

impl TapOptions {
    pub fn validate(&self) -> Result<()> {
        if self.nb_fingers == 0 {
            return Err(ConfigError::invalid("tap", "nb_fingers", "must be at least 1"));
        }
        if let Some(max) = self.nb_tap_max {
            if self.nb_tap_min > max {
                return Err(ConfigError::invalid(
                    "tap",
                    "nb_tap_min",
                    format!("{} is above nb_tap_max {max}", self.nb_tap_min),
                ));
            }
        }
        if self.tap_interval < 0.0 {
            return Err(ConfigError::invalid("tap", "tap_interval", "must not be negative"));
        }
        if self.max_distance_moving.is_some_and(|d| d < 0.0) {
            return Err(ConfigError::invalid("tap", "max_distance_moving", "must not be negative"));
        }
        Ok(())
    }

    fn accepts_count(&self, count: u32) -> bool {
        count >= self.nb_tap_min && self.nb_tap_max.map_or(true, |max| count <= max)
    }
}

/// Payload of a recognized tap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TapData {
    /// Consecutive taps in the current series.
    pub nb_tap: u32,
    /// Release time of the last tap (ms).
    pub last_tap_timestamp: f64,
}

/// Single or multiple tap.
///
/// A press counts as a tap when it is shorter than `tap_interval` and moved
/// less than `max_distance_moving`. Taps separated by more than
/// `tap_interval` start a new series.
#[derive(Debug, Clone, Default)]
pub struct Tap {
    options: TapOptions,
    data: TapData,
}

impl Tap {
    /// Create the recognizer after validating its options.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range option.
    pub fn new(options: TapOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            data: TapData::default(),
        })
    }

    pub const fn options(&self) -> &TapOptions {
        &self.options
    }

    /// Current series state.
    pub const fn data(&self) -> TapData {
        self.data
    }
}

impl Recognizer for Tap {
    fn name(&self) -> &'static str {
        "tap"
    }

    fn on_finger_added(
        &mut self,
        ctx: &mut GestureContext<'_>,
        finger: &FingerRef,
        fingers: &[FingerRef],
    ) {
        if ctx.is_listening() || fingers.len() < self.options.nb_fingers {
            return;
        }
        if finger.time() - self.data.last_tap_timestamp > self.options.tap_interval {
            self.data = TapData::default();
        }
        for f in &fingers[..self.options.nb_fingers] {
            ctx.listen(f);
        }
    }

    fn on_finger_removed(&mut self, ctx: &mut GestureContext<'_>, finger: &FingerRef) {
        ctx.unlisten_all();

        let short = finger.total_time() < self.options.tap_interval;
        let still = self
            .options
            .max_distance_moving
            .map_or(true, |max| finger.distance() < max);
        if !(short && still) {
            return;
        }

        self.data.last_tap_timestamp = finger.time();
        self.data.nb_tap += 1;
        if self.options.accepts_count(self.data.nb_tap) {
            ctx.fire(EventType::Instant, GestureData::Tap(self.data));
        }
    }
}
