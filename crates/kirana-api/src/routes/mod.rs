//! # API Route Modules
//!
//! - `delivery` — delivery pricing surface consumed by the storefront
//!   checkout flow: fee quotes, deliverability checks, delivery slots,
//!   and transit estimates.

pub mod delivery;
