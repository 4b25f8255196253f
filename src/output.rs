//! Result types handed to the persistence and rendering layers.
//!
//! Everything here is a plain serializable snapshot. A new calculation or a
//! new layout produces a new value; nothing is patched in place.

use crate::content::sections::Section;
use crate::content::tables::{PricingTable, ScopeRow};
use crate::pricing::addons::AddonFrequency;
use serde::{Deserialize, Serialize};

/// Estimated price band around the computed total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

/// Estimated labor hours per visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursEstimate {
    pub min: u32,
    pub max: u32,
}

/// Units (square feet or windows) a crew clears per hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductionRate {
    pub min: f64,
    pub max: f64,
}

/// The rate-table values a price was computed with, so a stored result
/// explains itself after the table changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub labor_rate: f64,
    pub overhead_percentage: f64,
    pub margin_percentage: f64,
    pub production_rate: ProductionRate,
}

/// Output of [`crate::pricing::calculate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub price_range: PriceRange,
    pub hours_estimate: HoursEstimate,
    pub assumptions: Assumptions,
}

/// A charge that does not recur monthly and is listed apart from the
/// monthly total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneTimeCharge {
    pub sku: String,
    pub label: String,
    pub frequency: AddonFrequency,
    pub amount: f64,
}

/// Output of [`crate::pricing::summarize_monthly`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Midpoint of the base price range.
    pub base_monthly: f64,
    /// Sum of every add-on's monthly amount.
    pub addons_monthly: f64,
    pub total_monthly: f64,
    /// Add-ons without a monthly amount, in input order.
    pub one_time_charges: Vec<OneTimeCharge>,
    pub one_time_total: f64,
}

/// Output of [`crate::layout::build_layout`]: everything a proposal template
/// needs to place the AI-generated content on pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalLayout {
    /// Every section in document order, synthetic sections included.
    pub sections: Vec<Section>,
    pub introduction: Option<Section>,
    pub scope: Option<Section>,
    pub addons: Option<Section>,
    pub pricing: Option<Section>,
    pub notes: Option<Section>,
    /// Scope table rows split into page-sized chunks. Empty when the scope
    /// section has no readable table.
    pub scope_pages: Vec<Vec<ScopeRow>>,
    pub pricing_table: Option<PricingTable>,
}

impl ProposalLayout {
    /// Number of pages the scope table occupies.
    pub fn scope_page_count(&self) -> usize {
        self.scope_pages.len()
    }
}
