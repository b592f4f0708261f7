//! # kirana-api — Axum REST Surface for the Delivery Engine
//!
//! The storefront checkout flow consumes this API; everything else the
//! storefront does (catalog, cart, orders) lives in other services.
//!
//! ## API Surface
//!
//! | Route                       | Module               | Purpose            |
//! |-----------------------------|----------------------|--------------------|
//! | `POST /v1/delivery/quote`   | [`routes::delivery`] | Fee quote          |
//! | `POST /v1/delivery/check`   | [`routes::delivery`] | Deliverability     |
//! | `GET  /v1/delivery/slots`   | [`routes::delivery`] | Delivery windows   |
//! | `POST /v1/delivery/estimate`| [`routes::delivery`] | Transit estimate   |
//! | `GET  /openapi.json`        | [`openapi`]          | OpenAPI spec       |
//! | `GET  /health/*`            | here                 | Probes             |
//!
//! No authentication: the service sits behind the storefront gateway,
//! which owns sessions. Request tracing via `tower_http::trace`.

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Assemble the application router.
///
/// Health probes are mounted beside the API routes; body size is capped
/// at 64 KiB — every request body here is a short JSON document.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::delivery::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(probes).merge(api)
}

/// GET /health/liveness — process is up.
async fn liveness() -> &'static str {
    "ok"
}

/// GET /health/readiness — ready to serve. The engine is stateless and
/// fails open on geocoding outages, so readiness equals liveness.
async fn readiness() -> &'static str {
    "ready"
}
