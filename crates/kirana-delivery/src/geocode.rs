//! # Geocoding Seam
//!
//! Resolving a free-text address to coordinates is the engine's only
//! outbound dependency, so it sits behind the [`Geocoder`] trait. The
//! production adapter (OpenCage, behind the `opencage` feature) is a
//! reqwest client with a bounded timeout; tests and keyless deployments
//! use the in-memory implementations below.
//!
//! ## Error Taxonomy
//!
//! - [`GeocodeError::AddressNotResolvable`] — the provider answered but
//!   found no match for the address.
//! - [`GeocodeError::ProviderUnavailable`] — network error, timeout, or a
//!   non-2xx response.
//!
//! Neither variant reaches callers of the pricing engine: both trigger the
//! fail-open minimum-fee quote in [`pricing`](crate::pricing).

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinates;

/// Errors from address resolution.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// The provider returned no match for the address.
    #[error("address not resolvable: {0}")]
    AddressNotResolvable(String),

    /// The provider could not be reached, timed out, or answered with a
    /// non-success status.
    #[error("geocoding provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// A successfully resolved address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Resolved coordinates.
    pub coordinates: Coordinates,
    /// The provider's normalized rendering of the address.
    pub formatted_address: String,
}

/// Capability to resolve a free-text address to coordinates.
///
/// Implementations make at most one attempt per call; retry policy is the
/// caller's concern (the pricing engine deliberately has none — a single
/// failure triggers its fail-open path).
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `address` to a location.
    async fn resolve(&self, address: &str) -> Result<ResolvedLocation, GeocodeError>;
}

/// In-memory geocoder backed by an explicit address table.
///
/// Lookup is exact on the trimmed address string. Unknown addresses yield
/// [`GeocodeError::AddressNotResolvable`].
#[derive(Debug, Default)]
pub struct FixtureGeocoder {
    entries: HashMap<String, Coordinates>,
}

impl FixtureGeocoder {
    /// Create an empty fixture table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an address → coordinates entry.
    pub fn with(mut self, address: impl Into<String>, coordinates: Coordinates) -> Self {
        self.entries.insert(address.into(), coordinates);
        self
    }
}

#[async_trait]
impl Geocoder for FixtureGeocoder {
    async fn resolve(&self, address: &str) -> Result<ResolvedLocation, GeocodeError> {
        let key = address.trim();
        match self.entries.get(key) {
            Some(coordinates) => Ok(ResolvedLocation {
                coordinates: *coordinates,
                formatted_address: key.to_string(),
            }),
            None => Err(GeocodeError::AddressNotResolvable(key.to_string())),
        }
    }
}

/// Deterministic stand-in used when no provider API key is configured.
///
/// Returns the configured origin displaced by a small jitter derived from
/// the address hash, so nearby-looking results vary per address but stay
/// stable across calls. Carried over from the original system's keyless
/// demo mode.
///
/// ## Warning
///
/// This implementation performs NO actual address resolution. Every
/// address appears to be a short hop from the store. It is suitable only
/// for development and demos.
#[derive(Debug, Clone)]
pub struct OfflineGeocoder {
    origin: Coordinates,
}

impl OfflineGeocoder {
    /// Create an offline geocoder centered on `origin` (normally the
    /// store location).
    pub fn new(origin: Coordinates) -> Self {
        Self { origin }
    }
}

#[async_trait]
impl Geocoder for OfflineGeocoder {
    async fn resolve(&self, address: &str) -> Result<ResolvedLocation, GeocodeError> {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        address.trim().hash(&mut hasher);
        // Jitter in [0, 0.0099] degrees, roughly a kilometer at most.
        let jitter = (hasher.finish() % 100) as f64 / 10_000.0;

        Ok(ResolvedLocation {
            coordinates: Coordinates::new(self.origin.lat + jitter, self.origin.lng + jitter),
            formatted_address: address.trim().to_string(),
        })
    }
}

#[cfg(feature = "opencage")]
mod opencage;

#[cfg(feature = "opencage")]
pub use opencage::{OpenCageConfig, OpenCageGeocoder};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_resolves_known_address() {
        let geocoder = FixtureGeocoder::new().with("Pitampura", Coordinates::new(28.7041, 77.1025));
        let loc = geocoder.resolve("Pitampura").await.unwrap();
        assert_eq!(loc.coordinates, Coordinates::new(28.7041, 77.1025));
        assert_eq!(loc.formatted_address, "Pitampura");
    }

    #[tokio::test]
    async fn fixture_trims_before_lookup() {
        let geocoder = FixtureGeocoder::new().with("Pitampura", Coordinates::new(28.7041, 77.1025));
        assert!(geocoder.resolve("  Pitampura  ").await.is_ok());
    }

    #[tokio::test]
    async fn fixture_rejects_unknown_address() {
        let geocoder = FixtureGeocoder::new();
        let err = geocoder.resolve("nowhere").await.unwrap_err();
        assert!(matches!(err, GeocodeError::AddressNotResolvable(_)));
    }

    #[tokio::test]
    async fn offline_is_deterministic_per_address() {
        let geocoder = OfflineGeocoder::new(Coordinates::new(28.6139, 77.2090));
        let first = geocoder.resolve("44 Lajpat Nagar").await.unwrap();
        let second = geocoder.resolve("44 Lajpat Nagar").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn offline_stays_near_origin() {
        let origin = Coordinates::new(28.6139, 77.2090);
        let geocoder = OfflineGeocoder::new(origin);
        let loc = geocoder.resolve("anywhere at all").await.unwrap();
        assert!((loc.coordinates.lat - origin.lat).abs() < 0.01);
        assert!((loc.coordinates.lng - origin.lng).abs() < 0.01);
    }

    #[test]
    fn error_display() {
        let err = GeocodeError::AddressNotResolvable("x".into());
        assert!(err.to_string().contains("not resolvable"));
        let err = GeocodeError::ProviderUnavailable("timed out".into());
        assert!(err.to_string().contains("timed out"));
    }
}
