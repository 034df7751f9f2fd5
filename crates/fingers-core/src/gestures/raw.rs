use crate::error::{ConfigError, Result};
use crate::finger::FingerRef;
use crate::gesture::{EventType, GestureContext, GestureData, Recognizer};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Options of the [`Raw`] recognizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOptions {
    /// Maximum number of fingers followed at once, `None` for unbounded.
    pub nb_max_fingers: Option<usize>,
}

impl RawOptions {
    pub fn validate(&self) -> Result<()> {
        if self.nb_max_fingers == Some(0) {
            return Err(ConfigError::invalid("raw", "nb_max_fingers", "must be at least 1"));
        }
        Ok(())
    }
}

/// Pass-through of every finger event, with the finger as payload.
#[derive(Debug, Clone, Default)]
pub struct Raw {
    options: RawOptions,
}

impl Raw {
    /// Create the recognizer after validating its options.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range option.
    pub fn new(options: RawOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub const fn options(&self) -> &RawOptions {
        &self.options
    }
}

impl Recognizer for Raw {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn on_finger_added(
        &mut self,
        ctx: &mut GestureContext<'_>,
        finger: &FingerRef,
        _fingers: &[FingerRef],
    ) {
        let listened = ctx.listened_fingers().len();
        if self.options.nb_max_fingers.map_or(true, |max| listened < max) {
            ctx.listen(finger);
            ctx.fire(EventType::Start, GestureData::Finger(Rc::clone(finger)));
        }
    }

    fn on_finger_update(&mut self, ctx: &mut GestureContext<'_>, finger: &FingerRef) {
        ctx.fire(EventType::Move, GestureData::Finger(Rc::clone(finger)));
    }

    fn on_finger_removed(&mut self, ctx: &mut GestureContext<'_>, finger: &FingerRef) {
        ctx.fire(EventType::End, GestureData::Finger(Rc::clone(finger)));
        ctx.unlisten(finger);
    }
}
