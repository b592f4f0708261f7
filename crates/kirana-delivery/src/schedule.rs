//! # Delivery Windows & Transit Estimates
//!
//! The storefront offers four fixed daily delivery windows and a simple
//! preparation-plus-travel time estimate.
//!
//! Slot availability is deliberately a stub: every date returns the same
//! four windows, all available. There is no per-date capacity, booking,
//! or allocation — callers (and tests) must not assume any.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kitchen/packing time before the rider leaves, in minutes.
const PREP_MINUTES: u32 = 30;

/// Travel pace in minutes per kilometer, traffic included.
const TRAVEL_MINUTES_PER_KM: f64 = 3.0;

/// A delivery time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySlot {
    /// Stable identifier, e.g. "9-12".
    pub id: String,
    /// Display label, e.g. "9:00 AM - 12:00 PM".
    pub window: String,
    /// Always `true` today; kept so the storefront contract does not
    /// change when capacity limits arrive.
    pub available: bool,
}

/// Preparation + travel estimate, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitEstimate {
    /// Fixed preparation time.
    pub prep_minutes: u32,
    /// Travel time, billed per started kilometer-minute.
    pub travel_minutes: u32,
    /// `prep_minutes + travel_minutes`.
    pub total_minutes: u32,
}

/// Delivery windows for `date`. Same four windows for every date.
pub fn available_slots(_date: NaiveDate) -> Vec<DeliverySlot> {
    [
        ("9-12", "9:00 AM - 12:00 PM"),
        ("12-15", "12:00 PM - 3:00 PM"),
        ("15-18", "3:00 PM - 6:00 PM"),
        ("18-21", "6:00 PM - 9:00 PM"),
    ]
    .into_iter()
    .map(|(id, window)| DeliverySlot {
        id: id.to_string(),
        window: window.to_string(),
        available: true,
    })
    .collect()
}

/// Estimate door-to-door time for a delivery over `distance_km`.
pub fn estimate_transit_time(distance_km: f64) -> TransitEstimate {
    let travel_minutes = (distance_km * TRAVEL_MINUTES_PER_KM).ceil() as u32;
    TransitEstimate {
        prep_minutes: PREP_MINUTES,
        travel_minutes,
        total_minutes: PREP_MINUTES + travel_minutes,
    }
}
