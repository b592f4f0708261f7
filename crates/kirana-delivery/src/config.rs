//! # Engine Configuration
//!
//! Store location, zone table, and fee policy, passed into
//! [`DeliveryPricing`](crate::DeliveryPricing) at construction. The source
//! deployment kept these as module-level constants; here they are explicit
//! configuration so each storefront instance can carry its own values and
//! tests can construct arbitrary ones.
//!
//! All monetary amounts are whole currency units (the storefront prices in
//! whole rupees).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinates;
use crate::zone::DeliveryZone;

/// Configuration validation failure. Raised at construction time so an
/// invalid pricing table can never produce a quote.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Store coordinates are out of range or non-finite.
    #[error("invalid store coordinates: lat {lat}, lng {lng}")]
    InvalidStoreLocation {
        /// Configured latitude.
        lat: f64,
        /// Configured longitude.
        lng: f64,
    },

    /// A zone radius is negative or non-finite.
    #[error("invalid radius for zone {name:?}: {max_distance_km}")]
    InvalidZoneRadius {
        /// Zone display name.
        name: String,
        /// Configured radius.
        max_distance_km: f64,
    },

    /// A pricing constant is out of range.
    #[error("invalid pricing policy: {0}")]
    InvalidPolicy(String),
}

/// The store's fixed position. Constant for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreLocation {
    /// Store coordinates.
    pub coordinates: Coordinates,
    /// Display address shown on receipts and the storefront.
    pub address: String,
}

/// Fee policy constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Fee per started kilometer.
    pub rate_per_km: i64,
    /// Lower fee bound; also the flat fee applied when geocoding fails.
    pub minimum_fee: i64,
    /// Upper fee bound.
    pub maximum_fee: i64,
    /// Orders at or above this subtotal ship free, without a distance check.
    pub free_delivery_threshold: i64,
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Fixed store position.
    pub store: StoreLocation,
    /// Ordered zone table; declaration order is the matching tie-break.
    pub zones: Vec<DeliveryZone>,
    /// Fee policy.
    pub policy: PricingPolicy,
}

impl DeliveryConfig {
    /// Validate every constant. An empty zone table is permitted — it
    /// simply means no address is deliverable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.store.coordinates.is_valid() {
            return Err(ConfigError::InvalidStoreLocation {
                lat: self.store.coordinates.lat,
                lng: self.store.coordinates.lng,
            });
        }

        for zone in &self.zones {
            if !zone.max_distance_km.is_finite() || zone.max_distance_km < 0.0 {
                return Err(ConfigError::InvalidZoneRadius {
                    name: zone.name.clone(),
                    max_distance_km: zone.max_distance_km,
                });
            }
        }

        let p = &self.policy;
        if p.rate_per_km <= 0 {
            return Err(ConfigError::InvalidPolicy(format!(
                "rate_per_km must be positive, got {}",
                p.rate_per_km
            )));
        }
        if p.minimum_fee < 0 {
            return Err(ConfigError::InvalidPolicy(format!(
                "minimum_fee must be non-negative, got {}",
                p.minimum_fee
            )));
        }
        if p.maximum_fee < p.minimum_fee {
            return Err(ConfigError::InvalidPolicy(format!(
                "maximum_fee {} is below minimum_fee {}",
                p.maximum_fee, p.minimum_fee
            )));
        }
        if p.free_delivery_threshold < 0 {
            return Err(ConfigError::InvalidPolicy(format!(
                "free_delivery_threshold must be non-negative, got {}",
                p.free_delivery_threshold
            )));
        }

        Ok(())
    }
}

impl Default for DeliveryConfig {
    /// The original Delhi deployment: rate 5/km, fees clamped into
    /// [20, 100], free delivery at subtotal 500, five zones.
    fn default() -> Self {
        Self {
            store: StoreLocation {
                coordinates: Coordinates::new(28.6139, 77.2090),
                address: "123 Market Street, Delhi".to_string(),
            },
            zones: vec![
                DeliveryZone::new("Central Delhi", 15.0),
                DeliveryZone::new("South Delhi", 20.0),
                DeliveryZone::new("North Delhi", 12.0),
                DeliveryZone::new("East Delhi", 18.0),
                DeliveryZone::new("West Delhi", 16.0),
            ],
            policy: PricingPolicy {
                rate_per_km: 5,
                minimum_fee: 20,
                maximum_fee: 100,
                free_delivery_threshold: 500,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        DeliveryConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_zone_table_is_valid() {
        let mut config = DeliveryConfig::default();
        config.zones.clear();
        config.validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_store() {
        let mut config = DeliveryConfig::default();
        config.store.coordinates = Coordinates::new(91.0, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStoreLocation { .. })
        ));
    }

    #[test]
    fn rejects_negative_zone_radius() {
        let mut config = DeliveryConfig::default();
        config.zones[1].max_distance_km = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("South Delhi"));
    }

    #[test]
    fn rejects_zero_rate() {
        let mut config = DeliveryConfig::default();
        config.policy.rate_per_km = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn rejects_inverted_fee_bounds() {
        let mut config = DeliveryConfig::default();
        config.policy.maximum_fee = 10;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("below minimum_fee"));
    }

    #[test]
    fn rejects_negative_threshold() {
        let mut config = DeliveryConfig::default();
        config.policy.free_delivery_threshold = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_serde_roundtrip() {
        // Deployments ship this struct as a YAML file; field names are a
        // compatibility surface.
        let config = DeliveryConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: DeliveryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
