//! # kirana-delivery — Delivery Pricing Engine
//!
//! Converts a customer address and an order subtotal into a delivery
//! decision: deliverable or not, how far, and what fee to charge. This is
//! the one piece of the storefront backend that is more than CRUD, so it
//! lives in its own crate with no web-framework or binary concerns.
//!
//! ## Pipeline
//!
//! ```text
//! quote(address, subtotal)
//!   → free-delivery short-circuit (no geocoding for large orders)
//!   → geocode (external, via the Geocoder trait)
//!   → haversine distance from the store
//!   → first matching service zone (declaration order)
//!   → fee = ceil(km) * rate, clamped into [minimum_fee, maximum_fee]
//! ```
//!
//! ## Key Design Decisions
//!
//! 1. **The quote operation never fails.** Geocoding errors are caught
//!    inside [`DeliveryPricing::quote`] and converted into a flat
//!    minimum-fee quote. A geocoding outage must never block checkout;
//!    the cost is under-pricing far-away orders. See [`pricing`] for the
//!    full contract.
//!
//! 2. **Geocoding is a swappable capability.** The engine only knows the
//!    [`Geocoder`] trait. The OpenCage HTTP client lives behind the
//!    `opencage` feature; tests and keyless deployments use the in-memory
//!    implementations in [`geocode`].
//!
//! 3. **All pricing inputs are explicit configuration.** Store location,
//!    zone table, and fee policy arrive as a validated [`DeliveryConfig`]
//!    at construction. No process-wide constants, no global state.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Every type crossing the API boundary ([`Quote`], [`DeliveryConfig`],
//!   [`DeliverySlot`], [`TransitEstimate`]) implements
//!   `Serialize`/`Deserialize`.

pub mod config;
pub mod geo;
pub mod geocode;
pub mod pricing;
pub mod schedule;
pub mod zone;

pub use config::{ConfigError, DeliveryConfig, PricingPolicy, StoreLocation};
pub use geo::{haversine_km, Coordinates};
pub use geocode::{FixtureGeocoder, GeocodeError, Geocoder, OfflineGeocoder, ResolvedLocation};
pub use pricing::{DeliveryPricing, Quote};
pub use schedule::{available_slots, estimate_transit_time, DeliverySlot, TransitEstimate};
pub use zone::DeliveryZone;
