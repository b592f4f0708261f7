//! # OpenCage Forward-Geocoding Adapter
//!
//! Production [`Geocoder`] backed by the OpenCage Data API
//! (`GET /geocode/v1/json?q=<address>&key=<api_key>&limit=1`).
//!
//! ## Behavior
//!
//! - One request per resolution, bounded by the configured timeout.
//!   No retries — a failed attempt surfaces as an error and the pricing
//!   engine applies its fail-open fallback.
//! - `limit=1`: only the provider's best match is requested.
//! - An optional `countrycode` hint biases results toward the store's
//!   country. The hint is adapter configuration, not part of the
//!   [`Geocoder`] trait.
//!
//! ## Error Mapping
//!
//! | Condition                      | Error                        |
//! |--------------------------------|------------------------------|
//! | connect failure / timeout      | `ProviderUnavailable`        |
//! | non-2xx status                 | `ProviderUnavailable`        |
//! | undecodable response body      | `ProviderUnavailable`        |
//! | 2xx with empty `results`       | `AddressNotResolvable`       |

use async_trait::async_trait;
use serde::Deserialize;

use super::{GeocodeError, Geocoder, ResolvedLocation};
use crate::geo::Coordinates;

/// Default API endpoint.
const DEFAULT_ENDPOINT: &str = "https://api.opencagedata.com/geocode/v1/json";

/// Default request timeout in seconds. The source system issued this call
/// with no timeout at all; a bounded one is required so a slow provider
/// cannot stall checkout.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the OpenCage adapter.
#[derive(Debug, Clone)]
pub struct OpenCageConfig {
    /// API endpoint URL (HTTPS).
    pub endpoint: String,
    /// OpenCage API key.
    pub api_key: String,
    /// Optional ISO 3166-1 alpha-2 country hint, e.g. "in".
    pub country_hint: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl OpenCageConfig {
    /// Create a configuration with the default endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            country_hint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Bias results toward a country.
    pub fn with_country_hint(mut self, code: impl Into<String>) -> Self {
        self.country_hint = Some(code.into());
        self
    }

    /// Override the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OpenCage-backed geocoder.
#[derive(Debug)]
pub struct OpenCageGeocoder {
    client: reqwest::Client,
    config: OpenCageConfig,
}

impl OpenCageGeocoder {
    /// Build the adapter from configuration.
    ///
    /// Fails if the endpoint is not a valid URL or the HTTP client cannot
    /// be constructed.
    pub fn new(config: OpenCageConfig) -> Result<Self, GeocodeError> {
        url::Url::parse(&config.endpoint).map_err(|e| {
            GeocodeError::ProviderUnavailable(format!(
                "invalid endpoint {}: {e}",
                config.endpoint
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                GeocodeError::ProviderUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }
}

/// Top-level OpenCage response. Fields the adapter does not read are not
/// modeled.
#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    geometry: OpenCageGeometry,
    formatted: String,
}

#[derive(Debug, Deserialize)]
struct OpenCageGeometry {
    lat: f64,
    lng: f64,
}

#[async_trait]
impl Geocoder for OpenCageGeocoder {
    async fn resolve(&self, address: &str) -> Result<ResolvedLocation, GeocodeError> {
        let mut params: Vec<(&str, &str)> = vec![
            ("q", address),
            ("key", &self.config.api_key),
            ("limit", "1"),
        ];
        if let Some(code) = &self.config.country_hint {
            params.push(("countrycode", code));
        }

        let resp = self
            .client
            .get(&self.config.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodeError::ProviderUnavailable("request timed out".to_string())
                } else {
                    GeocodeError::ProviderUnavailable(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            return Err(GeocodeError::ProviderUnavailable(format!(
                "HTTP {}",
                resp.status()
            )));
        }

        let body: OpenCageResponse = resp.json().await.map_err(|e| {
            GeocodeError::ProviderUnavailable(format!("invalid JSON response: {e}"))
        })?;

        let best = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::AddressNotResolvable(address.to_string()))?;

        Ok(ResolvedLocation {
            coordinates: Coordinates::new(best.geometry.lat, best.geometry.lng),
            formatted_address: best.formatted,
        })
    }
}
