//! Concrete gesture recognizers.

mod drag;
mod hold;
mod pinch;
mod raw;
mod swipe;
mod tap;
mod transform;
mod zone_hover;

pub use drag::Drag;
pub use hold::{Hold, HoldOptions};
pub use pinch::{Pinch, PinchData, PinchOptions};
pub use raw::{Raw, RawOptions};
pub use swipe::{Swipe, SwipeData, SwipeOptions};
pub use tap::{Tap, TapData, TapOptions};
pub use transform::{Transform, TransformData, TransformOptions};
pub use zone_hover::{Zone, ZoneData, ZoneHover, ZoneHoverOptions, ZoneId, ZoneTransition};
