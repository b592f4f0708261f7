//! # Service Zones
//!
//! Named delivery zones with a maximum radius from the store. Zones form
//! an **ordered** list: the first zone (in declaration order) that is
//! active and whose radius covers the computed distance wins. Declaration
//! order is the tie-break when several zones could match, so operators
//! can put preferred zone labels first.

use serde::{Deserialize, Serialize};

/// A named delivery zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryZone {
    /// Display name, e.g. "South Delhi".
    pub name: String,
    /// Maximum great-circle distance from the store covered by this zone.
    pub max_distance_km: f64,
    /// Inactive zones are skipped during matching without being removed
    /// from the table.
    pub active: bool,
}

impl DeliveryZone {
    /// Create an active zone.
    pub fn new(name: impl Into<String>, max_distance_km: f64) -> Self {
        Self {
            name: name.into(),
            max_distance_km,
            active: true,
        }
    }

    /// Mark the zone inactive.
    pub fn disabled(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Select the first active zone whose radius covers `distance_km`.
pub fn match_zone(zones: &[DeliveryZone], distance_km: f64) -> Option<&DeliveryZone> {
    zones
        .iter()
        .find(|z| z.active && distance_km <= z.max_distance_km)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delhi_zones() -> Vec<DeliveryZone> {
        vec![
            DeliveryZone::new("Central Delhi", 15.0),
            DeliveryZone::new("South Delhi", 20.0),
            DeliveryZone::new("North Delhi", 12.0),
            DeliveryZone::new("East Delhi", 18.0),
            DeliveryZone::new("West Delhi", 16.0),
        ]
    }

    #[test]
    fn first_covering_zone_wins() {
        let zones = delhi_zones();
        // 13.4 km is covered by Central (15), South (20), East (18), and
        // West (16); Central is declared first.
        let z = match_zone(&zones, 13.4).unwrap();
        assert_eq!(z.name, "Central Delhi");
    }

    #[test]
    fn farther_distance_falls_through_to_wider_zone() {
        let zones = delhi_zones();
        let z = match_zone(&zones, 19.0).unwrap();
        assert_eq!(z.name, "South Delhi");
    }

    #[test]
    fn boundary_distance_is_inside() {
        let zones = delhi_zones();
        let z = match_zone(&zones, 15.0).unwrap();
        assert_eq!(z.name, "Central Delhi");
    }

    #[test]
    fn no_zone_covers_far_distance() {
        let zones = delhi_zones();
        assert!(match_zone(&zones, 20.01).is_none());
    }

    #[test]
    fn inactive_zones_are_skipped() {
        let zones = vec![
            DeliveryZone::new("Central Delhi", 15.0).disabled(),
            DeliveryZone::new("South Delhi", 20.0),
        ];
        let z = match_zone(&zones, 10.0).unwrap();
        assert_eq!(z.name, "South Delhi");
    }

    #[test]
    fn all_inactive_matches_nothing() {
        let zones = vec![
            DeliveryZone::new("Central Delhi", 15.0).disabled(),
            DeliveryZone::new("South Delhi", 20.0).disabled(),
        ];
        assert!(match_zone(&zones, 1.0).is_none());
    }

    #[test]
    fn empty_table_matches_nothing() {
        assert!(match_zone(&[], 0.0).is_none());
    }

    #[test]
    fn zone_serde_roundtrip() {
        let z = DeliveryZone::new("East Delhi", 18.0);
        let json = serde_json::to_string(&z).unwrap();
        let back: DeliveryZone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, z);
    }
}
