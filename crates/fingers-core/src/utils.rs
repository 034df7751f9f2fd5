//! Vector and scalar helpers shared by fingers and recognizers.

use crate::finger::Finger;
use serde::{Deserialize, Serialize};

/// Dominant axis direction of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards negative y.
    Up,
    /// Towards positive y.
    Down,
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
}

impl Direction {
    /// Check if this is a vertical direction.
    #[must_use]
    pub const fn is_vertical(&self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Check if this is a horizontal direction.
    #[must_use]
    pub const fn is_horizontal(&self) -> bool {
        !self.is_vertical()
    }
}

/// Whether a pinch brought fingers closer or spread them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grow {
    /// Fingers moved closer together.
    In,
    /// Fingers moved apart.
    Out,
}

/// Euclidean norm of a vector.
#[must_use]
pub fn distance(x: f64, y: f64) -> f64 {
    x.hypot(y)
}

/// Absolute velocity, `0` when the time delta is zero or undefined.
#[must_use]
pub fn velocity(delta_time: f64, delta_pos: f64) -> f64 {
    oriented_velocity(delta_time, delta_pos).abs()
}

/// Signed velocity, `0` when the time delta is zero or undefined.
#[must_use]
pub fn oriented_velocity(delta_time: f64, delta_pos: f64) -> f64 {
    if delta_time == 0.0 {
        return 0.0;
    }
    let v = delta_pos / delta_time;
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Angle of a vector measured from the positive y axis, in radians.
#[must_use]
pub fn angle(x: f64, y: f64) -> f64 {
    x.atan2(y)
}

/// Classify the dominant axis of a vector.
///
/// Horizontal wins exact ties, so `(5, 5)` is [`Direction::Right`]. A zero
/// vector classifies as [`Direction::Left`].
#[must_use]
pub fn direction(delta_x: f64, delta_y: f64) -> Direction {
    if delta_x.abs() >= delta_y.abs() {
        if delta_x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if delta_y > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// Ratio `value / reference`, or `1` when the reference is zero.
#[must_use]
pub fn ratio_or_identity(value: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        1.0
    } else {
        value / reference
    }
}

/// Angle between the current positions of two fingers.
#[must_use]
pub fn fingers_angle(first: &Finger, second: &Finger) -> f64 {
    angle(second.x() - first.x(), second.y() - first.y())
}

/// Distance between the current positions of two fingers.
#[must_use]
pub fn fingers_distance(first: &Finger, second: &Finger) -> f64 {
    distance(second.x() - first.x(), second.y() - first.y())
}

/// Rounded midpoint of two fingers.
#[must_use]
pub fn fingers_center(first: &Finger, second: &Finger) -> (f64, f64) {
    (
        ((first.x() + second.x()) / 2.0).round(),
        ((first.y() + second.y()) / 2.0).round(),
    )
}

/// Rounded centroid of any number of fingers, `None` for an empty slice.
#[must_use]
pub fn centroid<F: AsRef<Finger>>(fingers: &[F]) -> Option<(f64, f64)> {
    if fingers.is_empty() {
        return None;
    }
    let count = fingers.len() as f64;
    let (sx, sy) = fingers.iter().fold((0.0, 0.0), |(sx, sy), f| {
        let f = f.as_ref();
        (sx + f.x(), sy + f.y())
    });
    Some(((sx / count).round(), (sy / count).round()))
}
