//! Optional add-on services: catalog entries, proposal lines and
//! amortization of non-monthly charges.
//!
//! A line is created from a catalog entry plus a quantity and never edited
//! afterwards; [`AddonLine::with_quantity`] and [`AddonLine::with_frequency`]
//! price a fresh line and leave the original untouched.

use crate::error::ProposalError;
use crate::pricing::round_currency;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// How often an add-on is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddonFrequency {
    OneTime,
    Monthly,
    Quarterly,
    Annual,
}

impl AddonFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            AddonFrequency::OneTime => "one_time",
            AddonFrequency::Monthly => "monthly",
            AddonFrequency::Quarterly => "quarterly",
            AddonFrequency::Annual => "annual",
        }
    }
}

impl fmt::Display for AddonFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spread a charge over months.
///
/// Returns `None` when `amortize` is false and always for
/// [`AddonFrequency::OneTime`]. Quarterly and annual charges are divided by
/// 3 and 12 and rounded half-up to cents; monthly charges pass through.
///
/// ```rust
/// use veliz_proposals::{amortize_addon, AddonFrequency};
///
/// assert_eq!(amortize_addon(100.0, AddonFrequency::Annual, true), Some(8.33));
/// assert_eq!(amortize_addon(300.0, AddonFrequency::Quarterly, true), Some(100.0));
/// assert_eq!(amortize_addon(100.0, AddonFrequency::OneTime, true), None);
/// ```
pub fn amortize_addon(subtotal: f64, frequency: AddonFrequency, amortize: bool) -> Option<f64> {
    if !amortize {
        return None;
    }
    match frequency {
        AddonFrequency::OneTime => None,
        AddonFrequency::Monthly => Some(subtotal),
        AddonFrequency::Quarterly => Some(round_currency(subtotal / 3.0)),
        AddonFrequency::Annual => Some(round_currency(subtotal / 12.0)),
    }
}

fn default_true() -> bool {
    true
}

/// A priced add-on the sales team can attach to a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonCatalogEntry {
    pub sku: String,
    pub label: String,
    /// Billing unit shown next to the rate, e.g. `each`, `sqft`, `hour`.
    pub unit_type: String,
    pub rate: f64,
    #[serde(default)]
    pub min_qty: f64,
    pub default_frequency: AddonFrequency,
    pub frequency_options: Vec<AddonFrequency>,
    #[serde(default)]
    pub amortize_to_monthly: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_true")]
    pub show_in_proposals: bool,
}

impl AddonCatalogEntry {
    fn invalid(&self, reason: impl Into<String>) -> ProposalError {
        ProposalError::InvalidAddon {
            sku: self.sku.clone(),
            reason: reason.into(),
        }
    }

    /// Check the entry's own invariants.
    pub fn validate(&self) -> Result<(), ProposalError> {
        if self.sku.trim().is_empty() {
            return Err(self.invalid("sku must not be empty"));
        }
        if !self.rate.is_finite() || self.rate < 0.0 {
            return Err(self.invalid(format!("rate must be non-negative, got {}", self.rate)));
        }
        if !self.min_qty.is_finite() || self.min_qty < 0.0 {
            return Err(self.invalid(format!(
                "min_qty must be non-negative, got {}",
                self.min_qty
            )));
        }
        if self.frequency_options.is_empty() {
            return Err(self.invalid("frequency_options must not be empty"));
        }
        if !self.frequency_options.contains(&self.default_frequency) {
            return Err(self.invalid(format!(
                "default frequency {} is not among its frequency options",
                self.default_frequency
            )));
        }
        Ok(())
    }

    /// Price `qty` units of this entry billed at `frequency`, or at the
    /// entry's default frequency when `None`.
    ///
    /// # Errors
    /// * [`ProposalError::InactiveAddon`]
    /// * [`ProposalError::QuantityBelowMinimum`]
    /// * [`ProposalError::FrequencyNotOffered`]
    pub fn line(
        &self,
        qty: f64,
        frequency: Option<AddonFrequency>,
    ) -> Result<AddonLine, ProposalError> {
        self.validate()?;
        if !self.active {
            return Err(ProposalError::InactiveAddon {
                sku: self.sku.clone(),
            });
        }
        if !qty.is_finite() || qty < self.min_qty {
            return Err(ProposalError::QuantityBelowMinimum {
                sku: self.sku.clone(),
                qty,
                min_qty: self.min_qty,
            });
        }
        let frequency = frequency.unwrap_or(self.default_frequency);
        if !self.frequency_options.contains(&frequency) {
            return Err(ProposalError::FrequencyNotOffered {
                sku: self.sku.clone(),
                frequency: frequency.to_string(),
            });
        }

        let subtotal = qty * self.rate;
        Ok(AddonLine {
            sku: self.sku.clone(),
            label: self.label.clone(),
            unit_type: self.unit_type.clone(),
            rate: self.rate,
            qty,
            frequency,
            subtotal,
            monthly_amount: amortize_addon(subtotal, frequency, self.amortize_to_monthly),
        })
    }
}

/// An add-on attached to a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonLine {
    pub sku: String,
    pub label: String,
    pub unit_type: String,
    pub rate: f64,
    pub qty: f64,
    pub frequency: AddonFrequency,
    /// `qty × rate`, unrounded.
    pub subtotal: f64,
    /// Monthly equivalent, `None` for one-time or non-amortized charges.
    pub monthly_amount: Option<f64>,
}

impl AddonLine {
    /// A new line for `qty` units at this line's frequency.
    pub fn with_quantity(
        &self,
        entry: &AddonCatalogEntry,
        qty: f64,
    ) -> Result<AddonLine, ProposalError> {
        self.check_entry(entry)?;
        entry.line(qty, Some(self.frequency))
    }

    /// A new line for this line's quantity billed at `frequency`.
    pub fn with_frequency(
        &self,
        entry: &AddonCatalogEntry,
        frequency: AddonFrequency,
    ) -> Result<AddonLine, ProposalError> {
        self.check_entry(entry)?;
        entry.line(self.qty, Some(frequency))
    }

    fn check_entry(&self, entry: &AddonCatalogEntry) -> Result<(), ProposalError> {
        if entry.sku != self.sku {
            return Err(ProposalError::InvalidAddon {
                sku: self.sku.clone(),
                reason: format!("cannot reprice against catalog entry '{}'", entry.sku),
            });
        }
        Ok(())
    }

    /// True when the line contributes to the monthly total.
    pub fn is_recurring(&self) -> bool {
        self.monthly_amount.is_some()
    }
}

/// The add-on catalog, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddonCatalog {
    entries: Vec<AddonCatalogEntry>,
}

impl AddonCatalog {
    /// Build a catalog, rejecting invalid entries and duplicate skus.
    pub fn new(entries: Vec<AddonCatalogEntry>) -> Result<Self, ProposalError> {
        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), ProposalError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            entry.validate()?;
            if !seen.insert(entry.sku.as_str()) {
                return Err(ProposalError::DuplicateSku {
                    sku: entry.sku.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[AddonCatalogEntry] {
        &self.entries
    }

    pub fn find(&self, sku: &str) -> Option<&AddonCatalogEntry> {
        self.entries.iter().find(|e| e.sku == sku)
    }

    /// Entries that may be offered on a new proposal.
    pub fn proposal_entries(&self) -> impl Iterator<Item = &AddonCatalogEntry> {
        self.entries
            .iter()
            .filter(|e| e.active && e.show_in_proposals)
    }

    /// Look up `sku` and price a line for it.
    pub fn line(
        &self,
        sku: &str,
        qty: f64,
        frequency: Option<AddonFrequency>,
    ) -> Result<AddonLine, ProposalError> {
        self.find(sku)
            .ok_or_else(|| ProposalError::UnknownSku {
                sku: sku.to_string(),
            })?
            .line(qty, frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sku: &str) -> AddonCatalogEntry {
        AddonCatalogEntry {
            sku: sku.to_string(),
            label: "Interior window washing".to_string(),
            unit_type: "each".to_string(),
            rate: 250.0,
            min_qty: 1.0,
            default_frequency: AddonFrequency::Quarterly,
            frequency_options: vec![
                AddonFrequency::OneTime,
                AddonFrequency::Quarterly,
                AddonFrequency::Annual,
            ],
            amortize_to_monthly: true,
            active: true,
            show_in_proposals: true,
        }
    }

    #[test]
    fn amortization_values() {
        assert_eq!(amortize_addon(100.0, AddonFrequency::Annual, true), Some(8.33));
        assert_eq!(amortize_addon(1000.0, AddonFrequency::Annual, true), Some(83.33));
        assert_eq!(amortize_addon(300.0, AddonFrequency::Quarterly, true), Some(100.0));
        assert_eq!(amortize_addon(45.5, AddonFrequency::Monthly, true), Some(45.5));
        assert_eq!(amortize_addon(100.0, AddonFrequency::OneTime, true), None);
    }

    #[test]
    fn amortize_false_is_always_none() {
        for f in [
            AddonFrequency::OneTime,
            AddonFrequency::Monthly,
            AddonFrequency::Quarterly,
            AddonFrequency::Annual,
        ] {
            assert_eq!(amortize_addon(1234.0, f, false), None);
        }
    }

    #[test]
    fn line_uses_default_frequency() {
        let line = entry("windows-int").line(2.0, None).unwrap();
        assert_eq!(line.frequency, AddonFrequency::Quarterly);
        assert_eq!(line.subtotal, 500.0);
        assert_eq!(line.monthly_amount, Some(166.67));
        assert!(line.is_recurring());
    }

    #[test]
    fn one_time_line_has_no_monthly_amount() {
        let line = entry("windows-int")
            .line(1.0, Some(AddonFrequency::OneTime))
            .unwrap();
        assert_eq!(line.monthly_amount, None);
        assert!(!line.is_recurring());
    }

    #[test]
    fn quantity_below_minimum_rejected() {
        let mut e = entry("windows-int");
        e.min_qty = 3.0;
        assert!(matches!(
            e.line(2.0, None),
            Err(ProposalError::QuantityBelowMinimum { .. })
        ));
    }

    #[test]
    fn unoffered_frequency_rejected() {
        let err = entry("windows-int")
            .line(1.0, Some(AddonFrequency::Monthly))
            .unwrap_err();
        assert_eq!(
            err,
            ProposalError::FrequencyNotOffered {
                sku: "windows-int".into(),
                frequency: "monthly".into()
            }
        );
    }

    #[test]
    fn inactive_entry_rejected() {
        let mut e = entry("windows-int");
        e.active = false;
        assert!(matches!(
            e.line(1.0, None),
            Err(ProposalError::InactiveAddon { .. })
        ));
    }

    #[test]
    fn default_frequency_must_be_offered() {
        let mut e = entry("windows-int");
        e.frequency_options = vec![AddonFrequency::Annual];
        assert!(matches!(e.validate(), Err(ProposalError::InvalidAddon { .. })));

        e.frequency_options.clear();
        assert!(e.validate().is_err());
    }

    #[test]
    fn edits_produce_new_lines() {
        let e = entry("windows-int");
        let original = e.line(1.0, None).unwrap();
        let more = original.with_quantity(&e, 4.0).unwrap();
        let yearly = original.with_frequency(&e, AddonFrequency::Annual).unwrap();

        assert_eq!(original.qty, 1.0);
        assert_eq!(original.frequency, AddonFrequency::Quarterly);
        assert_eq!(more.subtotal, 1000.0);
        assert_eq!(more.monthly_amount, Some(333.33));
        assert_eq!(yearly.monthly_amount, Some(20.83));
    }

    #[test]
    fn reprice_against_other_entry_rejected() {
        let line = entry("windows-int").line(1.0, None).unwrap();
        assert!(line.with_quantity(&entry("carpet-spot"), 2.0).is_err());
    }

    #[test]
    fn catalog_rejects_duplicate_skus() {
        let err = AddonCatalog::new(vec![entry("a"), entry("b"), entry("a")]).unwrap_err();
        assert_eq!(err, ProposalError::DuplicateSku { sku: "a".into() });
    }

    #[test]
    fn catalog_filters_proposal_entries() {
        let mut hidden = entry("hidden");
        hidden.show_in_proposals = false;
        let mut retired = entry("retired");
        retired.active = false;
        let catalog = AddonCatalog::new(vec![entry("shown"), hidden, retired]).unwrap();

        let skus: Vec<&str> = catalog.proposal_entries().map(|e| e.sku.as_str()).collect();
        assert_eq!(skus, vec!["shown"]);
        assert!(matches!(
            catalog.line("missing", 1.0, None),
            Err(ProposalError::UnknownSku { .. })
        ));
    }

    #[test]
    fn catalog_deserializes_with_defaults() {
        let catalog: AddonCatalog = serde_json::from_str(
            r#"[{
                "sku": "fridge",
                "label": "Fridge clean-out",
                "unit_type": "each",
                "rate": 40,
                "default_frequency": "one_time",
                "frequency_options": ["one_time"]
            }]"#,
        )
        .unwrap();
        let entry = catalog.find("fridge").unwrap();
        assert!(entry.active);
        assert!(entry.show_in_proposals);
        assert!(!entry.amortize_to_monthly);
        assert_eq!(entry.min_qty, 0.0);
    }
}
