//! # Delivery Pricing
//!
//! The quote pipeline: free-delivery short-circuit, geocoding, haversine
//! distance, zone matching, and the bounded fee formula.
//!
//! ## The Quote Operation Never Fails
//!
//! Geocoding errors — no match, network failure, timeout — are caught
//! here and converted into a flat minimum-fee quote with
//! `deliverable: true`. A geocoding outage must never block checkout.
//! The trade-off is accepted and deliberate: during an outage a genuinely
//! out-of-zone customer is quoted the minimum fee instead of being
//! refused, under-charging distant orders. Degraded accuracy is flagged
//! only through the `message` field. Do not "fix" this path without
//! product sign-off; the storefront depends on it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, DeliveryConfig, PricingPolicy};
use crate::geo::haversine_km;
use crate::geocode::Geocoder;
use crate::schedule::{available_slots, estimate_transit_time, DeliverySlot, TransitEstimate};
use crate::zone::match_zone;

/// The outcome of a delivery pricing decision. Output only — nothing in
/// this component is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Fee to charge, in whole currency units. Zero when delivery is free
    /// or not possible.
    pub fee: i64,
    /// Great-circle distance from the store, rounded to 2 decimal places
    /// for display. Zero when no distance was computed.
    pub distance_km: f64,
    /// Whether the order can be delivered.
    pub deliverable: bool,
    /// The matched service zone, when one was found.
    pub zone: Option<String>,
    /// Human-readable explanation shown at checkout.
    pub message: String,
}

/// Round to 2 decimal places for display.
fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fee for a matched-zone delivery: every started kilometer is billed at
/// `rate_per_km`, then the total is clamped into the policy bounds.
fn fee_for_distance(policy: &PricingPolicy, distance_km: f64) -> i64 {
    let billed_km = distance_km.ceil() as i64;
    (billed_km * policy.rate_per_km).clamp(policy.minimum_fee, policy.maximum_fee)
}

/// Delivery pricing engine.
///
/// Holds a validated [`DeliveryConfig`] and a [`Geocoder`] capability.
/// Stateless per call: quotes do not observe or mutate anything beyond
/// their inputs, so a single instance is freely shared across request
/// handlers.
#[derive(Clone)]
pub struct DeliveryPricing {
    config: DeliveryConfig,
    geocoder: Arc<dyn Geocoder>,
}

impl std::fmt::Debug for DeliveryPricing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryPricing")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DeliveryPricing {
    /// Build the engine. Fails only on invalid configuration.
    pub fn new(config: DeliveryConfig, geocoder: Arc<dyn Geocoder>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, geocoder })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Price a delivery for `address` with an order `subtotal`.
    ///
    /// Always returns a [`Quote`]; see the module docs for the fail-open
    /// contract.
    pub async fn quote(&self, address: &str, subtotal: i64) -> Quote {
        let policy = &self.config.policy;

        // Large orders ship free without a distance check, so an invalid
        // address cannot block them and no geocoding quota is spent.
        if subtotal >= policy.free_delivery_threshold {
            return Quote {
                fee: 0,
                distance_km: 0.0,
                deliverable: true,
                zone: None,
                message: format!(
                    "Free delivery on orders above {}",
                    policy.free_delivery_threshold
                ),
            };
        }

        let resolved = match self.geocoder.resolve(address).await {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::warn!(%err, "geocoding failed; applying standard fee");
                return Quote {
                    fee: policy.minimum_fee,
                    distance_km: 0.0,
                    deliverable: true,
                    zone: None,
                    message: format!("Standard delivery fee: {}", policy.minimum_fee),
                };
            }
        };

        let distance = haversine_km(self.config.store.coordinates, resolved.coordinates);

        let Some(zone) = match_zone(&self.config.zones, distance) else {
            return Quote {
                fee: 0,
                distance_km: round_2dp(distance),
                deliverable: false,
                zone: None,
                message: "Sorry, we do not deliver to this area".to_string(),
            };
        };

        let fee = fee_for_distance(policy, distance);
        tracing::debug!(
            zone = %zone.name,
            distance_km = distance,
            fee,
            "delivery quote computed"
        );

        Quote {
            fee,
            distance_km: round_2dp(distance),
            deliverable: true,
            zone: Some(zone.name.clone()),
            message: format!("Delivery fee: {fee} ({} km)", distance.ceil() as i64),
        }
    }

    /// Whether `address` falls inside any active zone.
    ///
    /// Thin wrapper over [`quote`](Self::quote) with a zero subtotal.
    /// Inherits the fail-open contract: during a geocoding outage this
    /// answers `true`.
    pub async fn is_deliverable(&self, address: &str) -> bool {
        self.quote(address, 0).await.deliverable
    }

    /// Available delivery windows for `date`.
    ///
    /// Every date currently returns the same four windows, all available;
    /// there is no per-date capacity. See [`schedule`](crate::schedule).
    pub fn available_slots(&self, date: chrono::NaiveDate) -> Vec<DeliverySlot> {
        available_slots(date)
    }

    /// Preparation + travel time estimate for a delivery over
    /// `distance_km`.
    pub fn estimate_transit_time(&self, distance_km: f64) -> TransitEstimate {
        estimate_transit_time(distance_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use crate::geocode::{FixtureGeocoder, GeocodeError, ResolvedLocation};
    use crate::zone::DeliveryZone;
    use async_trait::async_trait;

    /// Geocoder that must never be invoked.
    struct PanicGeocoder;

    #[async_trait]
    impl Geocoder for PanicGeocoder {
        async fn resolve(&self, address: &str) -> Result<ResolvedLocation, GeocodeError> {
            panic!("geocoder invoked for {address}");
        }
    }

    /// Geocoder that always fails with a fixed error.
    struct FailingGeocoder(fn(String) -> GeocodeError);

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn resolve(&self, address: &str) -> Result<ResolvedLocation, GeocodeError> {
            Err((self.0)(address.to_string()))
        }
    }

    fn delhi_fixture() -> FixtureGeocoder {
        FixtureGeocoder::new()
            .with("store", Coordinates::new(28.6139, 77.2090))
            .with("Pitampura", Coordinates::new(28.7041, 77.1025))
            .with("Model Town", Coordinates::new(28.7344, 77.2090))
            .with("Mumbai", Coordinates::new(19.0760, 72.8777))
    }

    fn engine(geocoder: impl Geocoder + 'static) -> DeliveryPricing {
        DeliveryPricing::new(DeliveryConfig::default(), Arc::new(geocoder)).unwrap()
    }

    #[tokio::test]
    async fn free_delivery_skips_geocoding() {
        let pricing = engine(PanicGeocoder);
        let quote = pricing.quote("complete gibberish @@@", 500).await;
        assert_eq!(quote.fee, 0);
        assert_eq!(quote.distance_km, 0.0);
        assert!(quote.deliverable);
        assert!(quote.message.contains("Free delivery"));
    }

    #[tokio::test]
    async fn free_delivery_applies_above_threshold_too() {
        let pricing = engine(PanicGeocoder);
        let quote = pricing.quote("anything", 10_000).await;
        assert_eq!(quote.fee, 0);
        assert!(quote.deliverable);
    }

    #[tokio::test]
    async fn subtotal_below_threshold_geocodes() {
        let pricing = engine(delhi_fixture());
        let quote = pricing.quote("Pitampura", 499).await;
        assert!(quote.deliverable);
        assert!(quote.fee > 0);
    }

    #[tokio::test]
    async fn end_to_end_model_town_order() {
        // Store at Connaught Place, customer ~13.4 km north: the first
        // covering zone is Central Delhi (15 km) and the fee is
        // ceil(13.4) * 5 = 70, inside [20, 100].
        let pricing = engine(delhi_fixture());
        let quote = pricing.quote("Model Town", 200).await;

        assert!(quote.deliverable);
        assert_eq!(quote.fee, 70);
        assert_eq!(quote.zone.as_deref(), Some("Central Delhi"));
        assert!((13.35..13.45).contains(&quote.distance_km));
        assert_eq!(quote.distance_km, round_2dp(quote.distance_km));
        assert!(quote.message.contains("70"));
    }

    #[tokio::test]
    async fn end_to_end_pitampura_order() {
        // Pitampura is ~14.44 km out: still Central Delhi, billed as
        // 15 started kilometers, fee 75.
        let pricing = engine(delhi_fixture());
        let quote = pricing.quote("Pitampura", 200).await;

        assert!(quote.deliverable);
        assert_eq!(quote.fee, 75);
        assert_eq!(quote.zone.as_deref(), Some("Central Delhi"));
        assert!((14.0..15.0).contains(&quote.distance_km));
        assert_eq!(quote.distance_km, round_2dp(quote.distance_km));
    }

    #[tokio::test]
    async fn zero_distance_clamps_to_minimum_fee() {
        let pricing = engine(delhi_fixture());
        let quote = pricing.quote("store", 100).await;
        assert!(quote.deliverable);
        assert_eq!(quote.fee, 20);
        assert_eq!(quote.distance_km, 0.0);
    }

    #[tokio::test]
    async fn long_distance_clamps_to_maximum_fee() {
        // A single wide zone so a 50 km run matches: raw fee would be
        // ceil(50) * 5 = 250, clamped to 100.
        let mut config = DeliveryConfig::default();
        config.zones = vec![DeliveryZone::new("Extended", 100.0)];
        let geocoder = FixtureGeocoder::new()
            // Roughly 50 km north of the store.
            .with("far north", Coordinates::new(29.0639, 77.2090));
        let pricing = DeliveryPricing::new(config, Arc::new(geocoder)).unwrap();

        let quote = pricing.quote("far north", 100).await;
        assert!(quote.deliverable);
        assert_eq!(quote.fee, 100);
    }

    #[tokio::test]
    async fn out_of_zone_is_not_deliverable() {
        let pricing = engine(delhi_fixture());
        let quote = pricing.quote("Mumbai", 200).await;

        assert!(!quote.deliverable);
        assert_eq!(quote.fee, 0);
        assert!(quote.zone.is_none());
        assert!(quote.distance_km > 1000.0);
        assert_eq!(quote.distance_km, round_2dp(quote.distance_km));
        assert!(quote.message.contains("do not deliver"));
    }

    #[tokio::test]
    async fn provider_outage_falls_open_to_standard_fee() {
        let pricing = engine(FailingGeocoder(GeocodeError::ProviderUnavailable));
        let quote = pricing.quote("44 Lajpat Nagar", 200).await;

        assert!(quote.deliverable, "outage must not block delivery");
        assert_eq!(quote.fee, 20);
        assert_eq!(quote.distance_km, 0.0);
        assert!(quote.zone.is_none());
        assert!(quote.message.contains("Standard delivery fee"));
    }

    #[tokio::test]
    async fn unresolvable_address_falls_open_to_standard_fee() {
        let pricing = engine(FailingGeocoder(GeocodeError::AddressNotResolvable));
        let quote = pricing.quote("???", 200).await;

        assert!(quote.deliverable);
        assert_eq!(quote.fee, 20);
        assert_eq!(quote.distance_km, 0.0);
    }

    #[tokio::test]
    async fn is_deliverable_within_zone() {
        let pricing = engine(delhi_fixture());
        assert!(pricing.is_deliverable("Pitampura").await);
    }

    #[tokio::test]
    async fn is_deliverable_out_of_zone() {
        let pricing = engine(delhi_fixture());
        assert!(!pricing.is_deliverable("Mumbai").await);
    }

    #[tokio::test]
    async fn is_deliverable_during_outage_inherits_fail_open() {
        let pricing = engine(FailingGeocoder(GeocodeError::ProviderUnavailable));
        assert!(pricing.is_deliverable("anywhere").await);
    }

    #[tokio::test]
    async fn empty_zone_table_never_delivers() {
        let mut config = DeliveryConfig::default();
        config.zones.clear();
        let pricing = DeliveryPricing::new(config, Arc::new(delhi_fixture())).unwrap();
        let quote = pricing.quote("store", 100).await;
        assert!(!quote.deliverable);
        assert_eq!(quote.fee, 0);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_at_construction() {
        let mut config = DeliveryConfig::default();
        config.policy.maximum_fee = 1;
        assert!(DeliveryPricing::new(config, Arc::new(PanicGeocoder)).is_err());
    }

    #[tokio::test]
    async fn quote_serde_roundtrip() {
        let pricing = engine(delhi_fixture());
        let quote = pricing.quote("Pitampura", 200).await;
        let json = serde_json::to_string(&quote).unwrap();
        let back: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(back, quote);
    }

    #[test]
    fn round_2dp_examples() {
        assert_eq!(round_2dp(13.4444), 13.44);
        assert_eq!(round_2dp(13.445), 13.45);
        assert_eq!(round_2dp(0.0), 0.0);
        assert_eq!(round_2dp(19.999), 20.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// A matched-zone fee always lands inside the policy bounds.
            #[test]
            fn fee_is_always_bounded(distance in 0.0f64..2000.0) {
                let policy = DeliveryConfig::default().policy;
                let fee = fee_for_distance(&policy, distance);
                prop_assert!(fee >= policy.minimum_fee);
                prop_assert!(fee <= policy.maximum_fee);
            }

            /// Billing by started kilometers: the fee never decreases as
            /// distance grows.
            #[test]
            fn fee_is_monotonic(a in 0.0f64..2000.0, b in 0.0f64..2000.0) {
                let policy = DeliveryConfig::default().policy;
                let (near, far) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(
                    fee_for_distance(&policy, near) <= fee_for_distance(&policy, far)
                );
            }

            /// Display rounding is idempotent and stays within half a
            /// hundredth of the raw value.
            #[test]
            fn rounding_is_stable(distance in 0.0f64..2000.0) {
                let rounded = round_2dp(distance);
                prop_assert_eq!(round_2dp(rounded), rounded);
                prop_assert!((rounded - distance).abs() <= 0.005 + 1e-9);
            }
        }
    }
}
