//! Timestamped positions.

use serde::{Deserialize, Serialize};

/// A 2D point sampled at a given time.
///
/// Timestamps are milliseconds, in whatever time base the host platform uses
/// for its input events. Coordinates are page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Sample time in milliseconds.
    pub timestamp: f64,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(timestamp: f64, x: f64, y: f64) -> Self {
        Self { timestamp, x, y }
    }

    /// Check whether two positions share the same coordinates, ignoring time.
    #[must_use]
    pub fn same_point(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        crate::utils::distance(other.x - self.x, other.y - self.y)
    }

    /// Elapsed time since an earlier position.
    #[must_use]
    pub fn elapsed_since(&self, earlier: &Self) -> f64 {
        self.timestamp - earlier.timestamp
    }
}
