//! # Delivery Pricing API
//!
//! Routes:
//! - POST /v1/delivery/quote    — Price a delivery for an address + subtotal
//! - POST /v1/delivery/check    — Deliverability check for an address
//! - GET  /v1/delivery/slots    — Delivery windows for a date
//! - POST /v1/delivery/estimate — Quote plus door-to-door time estimate
//!
//! The quote operation itself never fails (geocoding outages degrade to a
//! flat minimum fee inside the engine); the only error responses here are
//! request validation failures and the estimate endpoint's business rule
//! that an undeliverable address cannot be scheduled.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use kirana_delivery::Quote;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Upper bound on free-text address length.
const MAX_ADDRESS_LEN: usize = 512;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/delivery/quote", post(quote_delivery))
        .route("/v1/delivery/check", post(check_delivery))
        .route("/v1/delivery/slots", get(delivery_slots))
        .route("/v1/delivery/estimate", post(estimate_delivery))
}

fn validate_address(address: &str) -> Result<(), String> {
    if address.trim().is_empty() {
        return Err("address must be non-empty".into());
    }
    if address.len() > MAX_ADDRESS_LEN {
        return Err(format!(
            "address too long: {} chars (max {MAX_ADDRESS_LEN})",
            address.len()
        ));
    }
    Ok(())
}

// ── Quote ───────────────────────────────────────────────────────

/// Request to price a delivery.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct QuoteRequest {
    /// Free-text delivery address.
    pub address: String,
    /// Order subtotal in whole currency units.
    pub subtotal: i64,
}

impl Validate for QuoteRequest {
    fn validate(&self) -> Result<(), String> {
        validate_address(&self.address)?;
        if self.subtotal < 0 {
            return Err(format!("subtotal must be non-negative, got {}", self.subtotal));
        }
        Ok(())
    }
}

/// A delivery pricing decision.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    /// Fee to charge; zero when delivery is free or not possible.
    pub fee: i64,
    /// Distance from the store, rounded to 2 decimal places.
    pub distance_km: f64,
    /// Whether the order can be delivered.
    pub deliverable: bool,
    /// Matched service zone, when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Checkout-facing explanation.
    pub message: String,
}

impl From<Quote> for QuoteResponse {
    fn from(q: Quote) -> Self {
        Self {
            fee: q.fee,
            distance_km: q.distance_km,
            deliverable: q.deliverable,
            zone: q.zone,
            message: q.message,
        }
    }
}

// ── Deliverability Check ────────────────────────────────────────

/// Request to check whether an address is deliverable.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CheckRequest {
    /// Free-text delivery address.
    pub address: String,
}

impl Validate for CheckRequest {
    fn validate(&self) -> Result<(), String> {
        validate_address(&self.address)
    }
}

/// Deliverability check result.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckResponse {
    /// Whether the address falls inside an active service zone.
    pub deliverable: bool,
    /// Storefront-facing explanation.
    pub message: String,
}

// ── Slots ───────────────────────────────────────────────────────

/// Query parameters for the slots endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SlotsQuery {
    /// Delivery date, `YYYY-MM-DD`. Defaults to today.
    pub date: Option<String>,
}

/// A delivery time window.
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotResponse {
    pub id: String,
    pub window: String,
    pub available: bool,
}

/// Delivery windows for a date.
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotsResponse {
    /// The date the windows apply to.
    pub date: NaiveDate,
    pub slots: Vec<SlotResponse>,
}

// ── Estimate ────────────────────────────────────────────────────

/// Request for a delivery time estimate.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct EstimateRequest {
    /// Free-text delivery address.
    pub address: String,
}

impl Validate for EstimateRequest {
    fn validate(&self) -> Result<(), String> {
        validate_address(&self.address)
    }
}

/// Quote plus door-to-door time estimate.
#[derive(Debug, Serialize, ToSchema)]
pub struct EstimateResponse {
    /// Fee to charge.
    pub fee: i64,
    /// Distance from the store, rounded to 2 decimal places.
    pub distance_km: f64,
    /// Matched service zone, when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Checkout-facing explanation.
    pub message: String,
    /// Fixed preparation time in minutes.
    pub prep_minutes: u32,
    /// Travel time in minutes.
    pub travel_minutes: u32,
    /// Total door-to-door minutes.
    pub total_minutes: u32,
}

// ── Handlers ────────────────────────────────────────────────────

/// POST /v1/delivery/quote — Price a delivery.
#[utoipa::path(
    post,
    path = "/v1/delivery/quote",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Delivery quote (never fails once validated)", body = QuoteResponse),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "delivery"
)]
pub(crate) async fn quote_delivery(
    State(state): State<AppState>,
    body: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let quote = state.pricing.quote(&req.address, req.subtotal).await;
    Ok(Json(quote.into()))
}

/// POST /v1/delivery/check — Deliverability check.
#[utoipa::path(
    post,
    path = "/v1/delivery/check",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Deliverability result", body = CheckResponse),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "delivery"
)]
pub(crate) async fn check_delivery(
    State(state): State<AppState>,
    body: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let deliverable = state.pricing.is_deliverable(&req.address).await;
    let message = if deliverable {
        "Delivery available".to_string()
    } else {
        "Delivery not available in this area".to_string()
    };
    Ok(Json(CheckResponse {
        deliverable,
        message,
    }))
}

/// GET /v1/delivery/slots — Delivery windows for a date.
#[utoipa::path(
    get,
    path = "/v1/delivery/slots",
    params(("date" = Option<String>, Query, description = "Delivery date (YYYY-MM-DD), defaults to today")),
    responses(
        (status = 200, description = "Available delivery windows", body = SlotsResponse),
        (status = 422, description = "Malformed date", body = crate::error::ErrorBody),
    ),
    tag = "delivery"
)]
pub(crate) async fn delivery_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = match &query.date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AppError::Validation(format!("invalid date {raw:?}, expected YYYY-MM-DD")))?,
        None => chrono::Utc::now().date_naive(),
    };

    let slots = state
        .pricing
        .available_slots(date)
        .into_iter()
        .map(|s| SlotResponse {
            id: s.id,
            window: s.window,
            available: s.available,
        })
        .collect();

    Ok(Json(SlotsResponse { date, slots }))
}

/// POST /v1/delivery/estimate — Quote plus transit time.
///
/// Undeliverable addresses are rejected with 422: an estimate for a
/// delivery that cannot happen is meaningless to the checkout flow. The
/// underlying quote still never fails — during a geocoding outage the
/// fail-open quote (distance 0) yields a prep-only estimate.
#[utoipa::path(
    post,
    path = "/v1/delivery/estimate",
    request_body = EstimateRequest,
    responses(
        (status = 200, description = "Delivery time estimate", body = EstimateResponse),
        (status = 422, description = "Validation error or undeliverable address", body = crate::error::ErrorBody),
    ),
    tag = "delivery"
)]
pub(crate) async fn estimate_delivery(
    State(state): State<AppState>,
    body: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Json<EstimateResponse>, AppError> {
    let req = extract_validated_json(body)?;

    let quote = state.pricing.quote(&req.address, 0).await;
    if !quote.deliverable {
        return Err(AppError::Validation(
            "delivery not available in this area".into(),
        ));
    }

    let transit = state.pricing.estimate_transit_time(quote.distance_km);
    Ok(Json(EstimateResponse {
        fee: quote.fee,
        distance_km: quote.distance_km,
        zone: quote.zone,
        message: quote.message,
        prep_minutes: transit.prep_minutes,
        travel_minutes: transit.travel_minutes,
        total_minutes: transit.total_minutes,
    }))
}
