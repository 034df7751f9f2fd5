//! Enter/leave notifications for rectangular zones.

use crate::error::{ConfigError, Result};
use crate::finger::{Finger, FingerRef};
use crate::gesture::{EventType, Gesture, GestureContext, GestureData, Recognizer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a zone within one [`ZoneHover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub u32);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone {}", self.0)
    }
}

/// Axis-aligned rectangle in page coordinates. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Zone {
    /// Assigned on registration when absent.
    #[serde(default)]
    pub id: Option<ZoneId>,
    /// Left edge (px).
    pub left: f64,
    /// Right edge (px).
    pub right: f64,
    /// Top edge (px).
    pub top: f64,
    /// Bottom edge (px).
    pub bottom: f64,
}

impl Zone {
    /// Create a zone from its top-left and bottom-right corners.
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            id: None,
            left,
            right,
            top,
            bottom,
        }
    }

    /// Set an explicit id.
    #[must_use]
    pub const fn with_id(mut self, id: ZoneId) -> Self {
        self.id = Some(id);
        self
    }

    /// Check if a point lies inside, edges included.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Check that the edges are ordered.
    ///
    /// # Errors
    ///
    /// Returns an error if `left > right` or `top > bottom`.
    pub fn validate(&self) -> Result<()> {
        if self.left > self.right {
            return Err(ConfigError::invalid(
                "zone_hover",
                "zones",
                format!("left {} is right of right {}", self.left, self.right),
            ));
        }
        if self.top > self.bottom {
            return Err(ConfigError::invalid(
                "zone_hover",
                "zones",
                format!("top {} is below bottom {}", self.top, self.bottom),
            ));
        }
        Ok(())
    }
}

/// Whether a finger entered or left a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneTransition {
    /// The finger moved into the zone.
    Enter,
    /// The finger moved out of the zone or was lifted.
    Leave,
}

/// Payload of a zone event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneData {
    /// Enter or leave.
    #[serde(rename = "type")]
    pub transition: ZoneTransition,
    /// The crossed zone, with its id.
    pub zone: Zone,
}

/// Options of the [`ZoneHover`] recognizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneHoverOptions {
    /// Zones registered at construction.
    pub zones: Vec<Zone>,
}

impl ZoneHoverOptions {
    /// Check every zone.
    ///
    /// # Errors
    ///
    /// Returns the first zone whose edges are out of order.
    pub fn validate(&self) -> Result<()> {
        self.zones.iter().try_for_each(Zone::validate)
    }
}

#[derive(Debug, Clone)]
struct Tracked {
    zone: Zone,
    id: ZoneId,
    hovered: bool,
}

/// Follows the first finger and reports zone boundary crossings.
#[derive(Debug, Clone, Default)]
pub struct ZoneHover {
    zones: Vec<Tracked>,
    next_id: u32,
}

impl ZoneHover {
    /// Create the recognizer after validating its options.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range option.
    pub fn new(options: ZoneHoverOptions) -> Result<Self> {
        options.validate()?;
        let mut hover = Self::default();
        for zone in options.zones {
            if hover.add_zone(zone).is_none() {
                log::debug!("no free zone id left, zone dropped");
            }
        }
        Ok(hover)
    }

    /// Register a zone and return its id.
    ///
    /// A zone carrying an id keeps it, and a zone whose id is already
    /// registered is not added twice. Otherwise the next free id is assigned,
    /// wrapping past `u32::MAX`. Returns `None` only when every id is taken.
    pub fn add_zone(&mut self, zone: Zone) -> Option<ZoneId> {
        let id = match zone.id {
            Some(id) if self.is_registered(id) => return Some(id),
            Some(id) => {
                self.next_id = self.next_id.max(id.0.saturating_add(1));
                id
            }
            None => {
                let id = self.free_id()?;
                self.next_id = id.0.checked_add(1).unwrap_or(0);
                id
            }
        };
        self.zones.push(Tracked {
            zone: zone.with_id(id),
            id,
            hovered: false,
        });
        Some(id)
    }

    fn is_registered(&self, id: ZoneId) -> bool {
        self.zones.iter().any(|t| t.id == id)
    }

    fn free_id(&self) -> Option<ZoneId> {
        (self.next_id..=u32::MAX)
            .chain(0..self.next_id)
            .map(ZoneId)
            .find(|id| !self.is_registered(*id))
    }

    /// Unregister a zone. No leave event is fired for it.
    pub fn remove_zone(&mut self, id: ZoneId) -> Option<Zone> {
        let index = self.zones.iter().position(|t| t.id == id)?;
        Some(self.zones.remove(index).zone)
    }

    /// Zones currently hovered, in registration order.
    #[must_use]
    pub fn hovered_zones(&self) -> Vec<Zone> {
        self.zones
            .iter()
            .filter(|t| t.hovered)
            .map(|t| t.zone)
            .collect()
    }

    /// Registered zones, in registration order.
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().map(|t| &t.zone)
    }

    fn check(&mut self, ctx: &mut GestureContext<'_>, finger: &Finger) {
        for tracked in &mut self.zones {
            let inside = tracked.zone.contains(finger.x(), finger.y());
            let transition = match (tracked.hovered, inside) {
                (false, true) => ZoneTransition::Enter,
                (true, false) => ZoneTransition::Leave,
                _ => continue,
            };
            tracked.hovered = inside;
            log::trace!("finger {} {:?} {}", finger.id(), transition, tracked.id);
            ctx.fire(
                EventType::Instant,
                GestureData::Zone(ZoneData {
                    transition,
                    zone: tracked.zone,
                }),
            );
        }
    }
}

impl Recognizer for ZoneHover {
    fn name(&self) -> &'static str {
        "zone_hover"
    }

    fn on_finger_added(
        &mut self,
        ctx: &mut GestureContext<'_>,
        finger: &FingerRef,
        _fingers: &[FingerRef],
    ) {
        if ctx.is_listening() {
            return;
        }
        ctx.listen(finger);
        self.check(ctx, finger);
    }

    fn on_finger_update(&mut self, ctx: &mut GestureContext<'_>, finger: &FingerRef) {
        self.check(ctx, finger);
    }

    fn on_finger_removed(&mut self, ctx: &mut GestureContext<'_>, finger: &FingerRef) {
        for tracked in self.zones.iter_mut().filter(|t| t.hovered) {
            tracked.hovered = false;
            ctx.fire(
                EventType::Instant,
                GestureData::Zone(ZoneData {
                    transition: ZoneTransition::Leave,
                    zone: tracked.zone,
                }),
            );
        }
        ctx.unlisten(finger);
    }
}

impl Gesture<ZoneHover> {
    /// Register a zone on a live gesture.
    pub fn add_zone(&self, zone: Zone) -> Option<ZoneId> {
        self.with_recognizer_mut(|hover| hover.add_zone(zone))
    }

    /// Unregister a zone on a live gesture.
    pub fn remove_zone(&self, id: ZoneId) -> Option<Zone> {
        self.with_recognizer_mut(|hover| hover.remove_zone(id))
    }

    /// Zones currently hovered, in registration order.
    pub fn hovered_zones(&self) -> Vec<Zone> {
        self.with_recognizer(ZoneHover::hovered_zones)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gestures::testing::{finger, lift, press, recorded, slide, Log};

    fn transitions(log: &Log) -> Vec<(ZoneTransition, Option<ZoneId>)> {
        log.borrow()
            .iter()
            .filter_map(|(_, data)| match data {
                GestureData::Zone(z) => Some((z.transition, z.zone.id)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_zone_contains_is_inclusive() {
        let zone = Zone::new(0.0, 0.0, 100.0, 100.0);
        assert!(zone.contains(0.0, 0.0));
        assert!(zone.contains(100.0, 100.0));
        assert!(!zone.contains(100.1, 50.0));
    }

    #[test]
    fn test_zone_ids_are_assigned() {
        let mut hover = ZoneHover::default();
        let a = hover.add_zone(Zone::new(0.0, 0.0, 10.0, 10.0));
        let b = hover.add_zone(Zone::new(0.0, 0.0, 20.0, 20.0).with_id(ZoneId(7)));
        let c = hover.add_zone(Zone::new(0.0, 0.0, 30.0, 30.0));
        assert_eq!((a, b, c), (Some(ZoneId(0)), Some(ZoneId(7)), Some(ZoneId(8))));
        // same id twice is ignored
        hover.add_zone(Zone::new(5.0, 5.0, 6.0, 6.0).with_id(ZoneId(7)));
        assert_eq!(hover.zones().count(), 3);
    }

    #[test]
    fn test_zone_ids_wrap_after_max() {
        let mut hover = ZoneHover::new(ZoneHoverOptions {
            zones: vec![
                Zone::new(0.0, 0.0, 10.0, 10.0).with_id(ZoneId(0)),
                Zone::new(0.0, 0.0, 10.0, 10.0).with_id(ZoneId(u32::MAX)),
                Zone::new(0.0, 0.0, 20.0, 20.0),
            ],
        })
        .unwrap();
        let ids: Vec<_> = hover.zones().map(|z| z.id).collect();
        assert_eq!(ids, vec![Some(ZoneId(0)), Some(ZoneId(u32::MAX)), Some(ZoneId(1))]);

        assert_eq!(hover.add_zone(Zone::new(0.0, 0.0, 5.0, 5.0)), Some(ZoneId(2)));
        assert_eq!(hover.zones().count(), 4);
    }

    #[test]
    fn test_zone_enter_and_leave_are_edge_triggered() {
        let (gesture, log) = recorded(ZoneHover::default());
        let id = gesture.add_zone(Zone::new(0.0, 0.0, 100.0, 100.0)).unwrap();

        let f = finger(1, 0.0, 150.0, 50.0);
        press(&gesture, &mut Vec::new(), &f);
        slide(&f, 10.0, 90.0, 50.0);
        slide(&f, 20.0, 80.0, 50.0);
        slide(&f, 30.0, 70.0, 50.0);
        assert_eq!(gesture.hovered_zones().len(), 1);
        slide(&f, 40.0, 120.0, 50.0);

        assert_eq!(
            transitions(&log),
            vec![
                (ZoneTransition::Enter, Some(id)),
                (ZoneTransition::Leave, Some(id)),
            ]
        );
        assert!(gesture.hovered_zones().is_empty());
    }

    #[test]
    fn test_zone_enter_on_press_inside() {
        let hover = ZoneHover::new(ZoneHoverOptions {
            zones: vec![Zone::new(0.0, 0.0, 10.0, 10.0)],
        })
        .unwrap();
        let (gesture, log) = recorded(hover);
        press(&gesture, &mut Vec::new(), &finger(1, 0.0, 5.0, 5.0));
        assert_eq!(transitions(&log), vec![(ZoneTransition::Enter, Some(ZoneId(0)))]);
    }

    #[test]
    fn test_zone_release_leaves_every_hovered_zone() {
        let (gesture, log) = recorded(ZoneHover::default());
        gesture.add_zone(Zone::new(0.0, 0.0, 100.0, 100.0));
        gesture.add_zone(Zone::new(50.0, 50.0, 200.0, 200.0));
        gesture.add_zone(Zone::new(500.0, 500.0, 600.0, 600.0));

        let f = finger(1, 0.0, 75.0, 75.0);
        press(&gesture, &mut Vec::new(), &f);
        lift(&f, 10.0);

        assert_eq!(
            transitions(&log),
            vec![
                (ZoneTransition::Enter, Some(ZoneId(0))),
                (ZoneTransition::Enter, Some(ZoneId(1))),
                (ZoneTransition::Leave, Some(ZoneId(0))),
                (ZoneTransition::Leave, Some(ZoneId(1))),
            ]
        );
        assert!(gesture.hovered_zones().is_empty());
        assert!(!gesture.is_listening());
    }

    #[test]
    fn test_zone_follows_first_finger_only() {
        let (gesture, log) = recorded(ZoneHover::default());
        gesture.add_zone(Zone::new(0.0, 0.0, 10.0, 10.0));
        let mut down = Vec::new();
        press(&gesture, &mut down, &finger(1, 0.0, 50.0, 50.0));
        let second = finger(2, 0.0, 50.0, 50.0);
        press(&gesture, &mut down, &second);
        slide(&second, 10.0, 5.0, 5.0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_remove_zone() {
        let (gesture, log) = recorded(ZoneHover::default());
        let id = gesture.add_zone(Zone::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert!(gesture.remove_zone(id).is_some());
        assert!(gesture.remove_zone(id).is_none());
        press(&gesture, &mut Vec::new(), &finger(1, 0.0, 5.0, 5.0));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_zone_validation() {
        assert!(Zone::new(0.0, 0.0, 10.0, 10.0).validate().is_ok());
        assert!(Zone::new(10.0, 0.0, 0.0, 10.0).validate().is_err());
        assert!(Zone::new(0.0, 10.0, 10.0, 0.0).validate().is_err());
    }
}
