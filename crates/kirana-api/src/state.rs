//! # Application State
//!
//! Shared state for the Axum application. The pricing engine is stateless
//! per call and internally `Arc`s its geocoder, so the whole state is a
//! cheap clone handed to every handler.

use std::sync::Arc;

use kirana_delivery::{
    Coordinates, DeliveryConfig, DeliveryPricing, Geocoder, OfflineGeocoder,
};

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The delivery pricing engine.
    pub pricing: DeliveryPricing,
}

impl AppState {
    /// Wrap an already-built pricing engine.
    pub fn new(pricing: DeliveryPricing) -> Self {
        Self { pricing }
    }

    /// Default-configured state with the offline geocoder — for demos and
    /// tests. Never resolves real addresses.
    pub fn offline() -> Self {
        let config = DeliveryConfig::default();
        let origin: Coordinates = config.store.coordinates;
        let geocoder: Arc<dyn Geocoder> = Arc::new(OfflineGeocoder::new(origin));
        let pricing =
            DeliveryPricing::new(config, geocoder).expect("default config is valid");
        Self { pricing }
    }
}
