//! Lazily computed kinematic metrics of a finger.
//!
//! Every metric lives in its own typed slot. A slot is either clean (holds the
//! value computed since the last position write) or dirty (empty). Writing a
//! new position clears every slot at once.

use crate::utils::Direction;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Identifies one derived metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    DeltaTime,
    TotalTime,
    DeltaX,
    DeltaY,
    DeltaDistance,
    TotalX,
    TotalY,
    TotalDistance,
    DeltaDirection,
    TotalDirection,
    VelocityX,
    VelocityY,
    Velocity,
    VelocityAverage,
    OrientedVelocityX,
    OrientedVelocityY,
}

impl Metric {
    /// All metrics, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::DeltaTime,
        Self::TotalTime,
        Self::DeltaX,
        Self::DeltaY,
        Self::DeltaDistance,
        Self::TotalX,
        Self::TotalY,
        Self::TotalDistance,
        Self::DeltaDirection,
        Self::TotalDirection,
        Self::VelocityX,
        Self::VelocityY,
        Self::Velocity,
        Self::VelocityAverage,
        Self::OrientedVelocityX,
        Self::OrientedVelocityY,
    ];
}

/// A single memo slot.
#[derive(Debug)]
pub(crate) struct Slot<T: Copy>(Cell<Option<T>>);

impl<T: Copy> Default for Slot<T> {
    fn default() -> Self {
        Self(Cell::new(None))
    }
}

impl<T: Copy> Slot<T> {
    pub(crate) fn get_or_compute(&self, compute: impl FnOnce() -> T) -> T {
        if let Some(value) = self.0.get() {
            return value;
        }
        let value = compute();
        self.0.set(Some(value));
        value
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.0.get().is_some()
    }

    fn clear(&self) {
        self.0.set(None);
    }
}

/// Memo table for the derived metrics of one finger.
#[derive(Debug, Default)]
pub(crate) struct MetricCache {
    pub(crate) delta_time: Slot<f64>,
    pub(crate) total_time: Slot<f64>,
    pub(crate) delta_x: Slot<f64>,
    pub(crate) delta_y: Slot<f64>,
    pub(crate) delta_distance: Slot<f64>,
    pub(crate) total_x: Slot<f64>,
    pub(crate) total_y: Slot<f64>,
    pub(crate) total_distance: Slot<f64>,
    pub(crate) delta_direction: Slot<Direction>,
    pub(crate) total_direction: Slot<Direction>,
    pub(crate) velocity_x: Slot<f64>,
    pub(crate) velocity_y: Slot<f64>,
    pub(crate) velocity: Slot<f64>,
    pub(crate) velocity_average: Slot<f64>,
    pub(crate) oriented_velocity_x: Slot<f64>,
    pub(crate) oriented_velocity_y: Slot<f64>,
}

impl MetricCache {
    /// Mark every slot dirty.
    pub(crate) fn clear(&self) {
        self.delta_time.clear();
        self.total_time.clear();
        self.delta_x.clear();
        self.delta_y.clear();
        self.delta_distance.clear();
        self.total_x.clear();
        self.total_y.clear();
        self.total_distance.clear();
        self.delta_direction.clear();
        self.total_direction.clear();
        self.velocity_x.clear();
        self.velocity_y.clear();
        self.velocity.clear();
        self.velocity_average.clear();
        self.oriented_velocity_x.clear();
        self.oriented_velocity_y.clear();
    }

    pub(crate) fn is_clean(&self, metric: Metric) -> bool {
        match metric {
            Metric::DeltaTime => self.delta_time.is_clean(),
            Metric::TotalTime => self.total_time.is_clean(),
            Metric::DeltaX => self.delta_x.is_clean(),
            Metric::DeltaY => self.delta_y.is_clean(),
            Metric::DeltaDistance => self.delta_distance.is_clean(),
            Metric::TotalX => self.total_x.is_clean(),
            Metric::TotalY => self.total_y.is_clean(),
            Metric::TotalDistance => self.total_distance.is_clean(),
            Metric::DeltaDirection => self.delta_direction.is_clean(),
            Metric::TotalDirection => self.total_direction.is_clean(),
            Metric::VelocityX => self.velocity_x.is_clean(),
            Metric::VelocityY => self.velocity_y.is_clean(),
            Metric::Velocity => self.velocity.is_clean(),
            Metric::VelocityAverage => self.velocity_average.is_clean(),
            Metric::OrientedVelocityX => self.oriented_velocity_x.is_clean(),
            Metric::OrientedVelocityY => self.oriented_velocity_y.is_clean(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_computes_once() {
        let slot: Slot<f64> = Slot::default();
        let mut calls = 0;
        assert_eq!(
            slot.get_or_compute(|| {
                calls += 1;
                4.0
            }),
            4.0
        );
        assert_eq!(
            slot.get_or_compute(|| {
                calls += 1;
                9.0
            }),
            4.0
        );
        assert_eq!(calls, 1);
        assert!(slot.is_clean());
    }

    #[test]
    fn test_cache_clear_marks_all_dirty() {
        let cache = MetricCache::default();
        cache.delta_x.get_or_compute(|| 1.0);
        cache.delta_direction.get_or_compute(|| Direction::Up);
        assert!(cache.is_clean(Metric::DeltaX));
        assert!(cache.is_clean(Metric::DeltaDirection));

        cache.clear();
        for metric in Metric::ALL {
            assert!(!cache.is_clean(metric), "{metric:?} should be dirty");
        }
    }
}
