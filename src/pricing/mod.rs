//! Deterministic pricing for cleaning-service proposals.
//!
//! ## Data Flow
//!
//! ```text
//! form input ──▶ details ──▶ calculator ──▶ PricingResult
//!                                               │
//! catalog ──▶ addons ──▶ AddonLine[] ──▶ totals ┴─▶ MonthlySummary
//! ```
//!
//! 1. [`details`]: turn the loosely-typed `service_specific_data` map into
//!    a per-service tagged union
//! 2. [`calculator`]: validate the form and compute the price band, hours
//!    and assumptions
//! 3. [`addons`]: catalog entries, add-on lines and amortization
//! 4. [`totals`]: fold the base price and add-on lines into a monthly
//!    figure plus a one-time-charges list
//!
//! Every function here is pure: the same input and rate table always yield
//! the same output.

pub mod addons;
pub mod calculator;
pub mod details;
pub mod totals;

pub use addons::{amortize_addon, AddonCatalog, AddonCatalogEntry, AddonFrequency, AddonLine};
pub use calculator::{calculate, calculate_breakdown, PriceBreakdown, PricingInput};
pub use details::ServiceDetails;
pub use totals::{summarize_monthly, total_monthly, BasePricing};

/// Round half-up to whole cents.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
