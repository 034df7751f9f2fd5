use crate::error::{ConfigError, Result};
use crate::finger::FingerRef;
use crate::gesture::{EventType, GestureContext, GestureData, Recognizer};
use crate::timer::OneShotTimer;
use serde::{Deserialize, Serialize};

/// Options of the [`Hold`] recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldOptions {
    /// Fingers that must be down together.
    pub nb_fingers: usize,
    /// Movement (px) from the start position that cancels the hold.
    pub distance_threshold: f64,
    /// Time (ms) the fingers must stay down.
    pub duration: f64,
}

impl Default for HoldOptions {
    fn default() -> Self {
        Self {
            nb_fingers: 1,
            distance_threshold: 10.0,
            duration: 500.0,
        }
    }
}

impl HoldOptions {
    pub fn validate(&self) -> Result<()> {
        if self.nb_fingers == 0 {
            return Err(ConfigError::invalid("hold", "nb_fingers", "must be at least 1"));
        }
        if self.distance_threshold < 0.0 {
            return Err(ConfigError::invalid("hold", "distance_threshold", "must not be negative"));
        }
        if self.duration < 0.0 {
            return Err(ConfigError::invalid("hold", "duration", "must not be negative"));
        }
        Ok(())
    }
}

/// Long press: fingers stay down, nearly still, for `duration` ms.
#[derive(Debug, Clone, Default)]
pub struct Hold {
    options: HoldOptions,
    timer: OneShotTimer,
}

impl Hold {
    /// Create the recognizer after validating its options.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range option.
    pub fn new(options: HoldOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            timer: OneShotTimer::new(),
        })
    }

    pub const fn options(&self) -> &HoldOptions {
        &self.options
    }

    /// Pending deadline, if a hold is being timed.
    pub const fn deadline(&self) -> Option<f64> {
        self.timer.deadline()
    }

    fn cancel(&mut self, ctx: &mut GestureContext<'_>) {
        self.timer.cancel();
        ctx.unlisten_all();
    }
}

impl Recognizer for Hold {
    fn name(&self) -> &'static str {
        "hold"
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
        for f in &fingers[..self.options.nb_fingers] {
            ctx.listen(f);
        }
        self.timer.arm(finger.time() + self.options.duration);
    }

    fn on_finger_update(&mut self, ctx: &mut GestureContext<'_>, _finger: &FingerRef) {
        let moved = ctx
            .listened_fingers()
            .iter()
            .any(|f| f.distance() > self.options.distance_threshold);
        if moved {
            log::trace!("hold canceled by movement");
            self.cancel(ctx);
        }
    }

    fn on_finger_removed(&mut self, ctx: &mut GestureContext<'_>, _finger: &FingerRef) {
        self.cancel(ctx);
    }

    fn on_timer(&mut self, ctx: &mut GestureContext<'_>, now: f64) {
        if self.timer.expire(now) {
            ctx.fire(EventType::Instant, GestureData::None);
        }
    }

    fn on_detach(&mut self) {
        self.timer.cancel();
    }
}
