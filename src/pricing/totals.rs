//! Folding the base price and add-on lines into a monthly figure.

use crate::output::{MonthlySummary, OneTimeCharge, PricingResult};
use crate::pricing::addons::AddonLine;
use serde::{Deserialize, Serialize};

/// The base-service price as stored with a proposal.
///
/// Older proposals may carry only one bound, so both are optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BasePricing {
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
}

impl BasePricing {
    /// `(low + high) / 2`, the single bound when only one exists, else 0.
    pub fn midpoint(&self) -> f64 {
        match (self.low, self.high) {
            (Some(low), Some(high)) => (low + high) / 2.0,
            (Some(bound), None) | (None, Some(bound)) => bound,
            (None, None) => 0.0,
        }
    }
}

impl From<&PricingResult> for BasePricing {
    fn from(result: &PricingResult) -> Self {
        Self {
            low: Some(result.price_range.low),
            high: Some(result.price_range.high),
        }
    }
}

/// Base midpoint plus every add-on's monthly amount.
pub fn total_monthly(base: &BasePricing, lines: &[AddonLine]) -> f64 {
    base.midpoint() + lines.iter().filter_map(|l| l.monthly_amount).sum::<f64>()
}

/// [`total_monthly`] together with the charges it leaves out.
pub fn summarize_monthly(base: &BasePricing, lines: &[AddonLine]) -> MonthlySummary {
    let base_monthly = base.midpoint();
    let addons_monthly: f64 = lines.iter().filter_map(|l| l.monthly_amount).sum();
    let one_time_charges: Vec<OneTimeCharge> = lines
        .iter()
        .filter(|l| l.monthly_amount.is_none())
        .map(|l| OneTimeCharge {
            sku: l.sku.clone(),
            label: l.label.clone(),
            frequency: l.frequency,
            amount: l.subtotal,
        })
        .collect();
    let one_time_total = one_time_charges.iter().map(|c| c.amount).sum();

    MonthlySummary {
        base_monthly,
        addons_monthly,
        total_monthly: base_monthly + addons_monthly,
        one_time_charges,
        one_time_total,
    }
}
