//! Planned survey leg records.

use serde::{Deserialize, Serialize};

use crate::geo::{distance_m, GeodeticPoint};

/// Identifier of a planned leg.
pub type LegId = u64;

/// Identifier of the zone a leg is planned in.
pub type ZoneId = u64;

/// A planned straight-line survey segment.
///
/// The record is owned by the caller (usually loaded from the survey store);
/// route ordering only writes `order` and `inverted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegDescriptor {
    /// Leg identifier, unique within the caller's set.
    pub id: LegId,
    /// Zone the leg is planned in.
    pub zone_id: ZoneId,
    /// Planned start point.
    pub start: GeodeticPoint,
    /// Planned end point.
    pub end: GeodeticPoint,
    /// 1-based visiting order, `None` until a route has been assigned.
    #[serde(default)]
    pub order: Option<u32>,
    /// When set, the leg is run from `end` to `start`.
    #[serde(default)]
    pub inverted: bool,
}

impl LegDescriptor {
    /// Create an unordered, non-inverted leg.
    pub fn new(id: LegId, zone_id: ZoneId, start: GeodeticPoint, end: GeodeticPoint) -> Self {
        Self {
            id,
            zone_id,
            start,
            end,
            order: None,
            inverted: false,
        }
    }

    /// Point where the vessel begins the leg.
    #[inline]
    pub fn entry_point(&self) -> GeodeticPoint {
        if self.inverted {
            self.end
        } else {
            self.start
        }
    }

    /// Point where the vessel leaves the leg.
    #[inline]
    pub fn exit_point(&self) -> GeodeticPoint {
        if self.inverted {
            self.start
        } else {
            self.end
        }
    }

    /// Length of the leg in metres.
    pub fn length_m(&self) -> f64 {
        distance_m(&self.start, &self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg() -> LegDescriptor {
        LegDescriptor::new(
            7,
            1,
            GeodeticPoint::new(0.0, 0.0),
            GeodeticPoint::new(0.0, 1.0),
        )
    }

    #[test]
    fn test_new_leg_is_unordered() {
        let leg = leg();
        assert_eq!(leg.order, None);
        assert!(!leg.inverted);
    }

    #[test]
    fn test_entry_and_exit_follow_inversion() {
        let mut leg = leg();
        assert_eq!(leg.entry_point(), leg.start);
        assert_eq!(leg.exit_point(), leg.end);

        leg.inverted = true;
        assert_eq!(leg.entry_point(), leg.end);
        assert_eq!(leg.exit_point(), leg.start);
    }

    #[test]
    fn test_length_is_endpoint_distance() {
        let leg = leg();
        assert_eq!(leg.length_m(), distance_m(&leg.start, &leg.end));
        assert!(leg.length_m() > 111_000.0 && leg.length_m() < 111_400.0);
    }

    #[test]
    fn test_missing_order_fields_deserialize_to_defaults() {
        let json = r#"{
            "id": 3,
            "zone_id": 9,
            "start": { "latitude": 1.0, "longitude": 2.0 },
            "end": { "latitude": 1.5, "longitude": 2.5 }
        }"#;
        let leg: LegDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(leg.id, 3);
        assert_eq!(leg.zone_id, 9);
        assert_eq!(leg.order, None);
        assert!(!leg.inverted);
    }
}
