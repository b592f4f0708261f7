//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented delivery routes into a single OpenAPI
//! spec served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the delivery API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kirana Delivery API",
        version = "0.1.0",
        description = "Delivery pricing surface for the Kirana grocery storefront.\n\nProvides:\n- **Fee quotes** from address + order subtotal (free-delivery aware, fail-open under geocoding outages)\n- **Deliverability checks** against the configured service zones\n- **Delivery slots** (four fixed daily windows)\n- **Transit estimates** (preparation + travel time)\n\nNo authentication: this service sits behind the storefront gateway.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::delivery::quote_delivery,
        crate::routes::delivery::check_delivery,
        crate::routes::delivery::delivery_slots,
        crate::routes::delivery::estimate_delivery,
    ),
    components(schemas(
        crate::routes::delivery::QuoteRequest,
        crate::routes::delivery::QuoteResponse,
        crate::routes::delivery::CheckRequest,
        crate::routes::delivery::CheckResponse,
        crate::routes::delivery::SlotResponse,
        crate::routes::delivery::SlotsResponse,
        crate::routes::delivery::EstimateRequest,
        crate::routes::delivery::EstimateResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "delivery", description = "Delivery pricing, slots, and estimates")
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_spec))
}

/// GET /openapi.json — the assembled spec.
async fn serve_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_contains_all_delivery_paths() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/v1/delivery/quote"));
        assert!(paths.iter().any(|p| p.as_str() == "/v1/delivery/check"));
        assert!(paths.iter().any(|p| p.as_str() == "/v1/delivery/slots"));
        assert!(paths.iter().any(|p| p.as_str() == "/v1/delivery/estimate"));
    }
}
