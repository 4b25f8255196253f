//! Configuration types for pricing and proposal layout.
//!
//! Pricing behaviour is controlled through [`RateTable`], layout behaviour
//! through [`LayoutConfig`]. Both are built via a builder that clamps each
//! setter into its legal range, and both deserialize from partial JSON so a
//! stored rate table only needs to name the values it overrides.
//!
//! # Fallback rule
//! A key missing from [`RateTable::rates`] or
//! [`RateTable::frequency_multipliers`] is resolved against the default table
//! at lookup time, not at load time. A table stored before a new service
//! type existed therefore still prices that service.

use crate::error::ProposalError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rows that fit on the first scope page, below its title and description.
pub const DEFAULT_FIRST_PAGE_ROWS: usize = 12;

/// Rows that fit on each continuation page.
pub const DEFAULT_CONTINUATION_ROWS: usize = 14;

/// Description shown for a scope section that holds nothing but its table.
pub const DEFAULT_SCOPE_DESCRIPTION: &str =
    "The areas below will be serviced at the frequencies shown.";

/// Description shown for a pricing section that holds nothing but its table.
pub const DEFAULT_PRICING_DESCRIPTION: &str =
    "The investment below covers the services outlined in this proposal.";

/// Per-unit rates, frequency multipliers and cost percentages used by
/// [`crate::pricing::calculate`].
///
/// Built via [`RateTable::builder()`], deserialized from JSON, or taken from
/// [`RateTable::default()`].
///
/// # Example
/// ```rust
/// use veliz_proposals::{RateTable, ServiceType};
///
/// let rates = RateTable::builder()
///     .service_rate(ServiceType::Commercial, 0.12)
///     .labor_rate(30.0)
///     .build()
///     .unwrap();
/// assert_eq!(rates.rate(ServiceType::Commercial), 0.12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    /// Currency per square foot, or per window for [`ServiceType::Window`].
    pub rates: BTreeMap<ServiceType, f64>,

    /// Dimensionless multiplier applied to the base price per visit cadence.
    pub frequency_multipliers: BTreeMap<ServiceFrequency, f64>,

    /// Currency per labor hour. Default: 25.
    pub labor_rate: f64,

    /// Overhead as a percentage (0–100) of the adjusted price. Default: 15.
    pub overhead_percentage: f64,

    /// Margin as a percentage (0–100) of the adjusted price. Default: 20.
    pub margin_percentage: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            rates: ServiceType::ALL
                .iter()
                .map(|s| (*s, s.default_rate()))
                .collect(),
            frequency_multipliers: ServiceFrequency::KNOWN
                .iter()
                .map(|f| (*f, f.default_multiplier()))
                .collect(),
            labor_rate: 25.0,
            overhead_percentage: 15.0,
            margin_percentage: 20.0,
        }
    }
}

impl RateTable {
    /// Create a new builder starting from the default table.
    pub fn builder() -> RateTableBuilder {
        RateTableBuilder {
            table: Self::default(),
        }
    }

    /// Per-unit rate for `service`, falling back to the default table.
    pub fn rate(&self, service: ServiceType) -> f64 {
        self.rates
            .get(&service)
            .copied()
            .unwrap_or_else(|| service.default_rate())
    }

    /// Multiplier for `frequency`, falling back to the default table.
    ///
    /// [`ServiceFrequency::Other`] always resolves to 1.0.
    pub fn multiplier(&self, frequency: ServiceFrequency) -> f64 {
        if frequency == ServiceFrequency::Other {
            return 1.0;
        }
        self.frequency_multipliers
            .get(&frequency)
            .copied()
            .unwrap_or_else(|| frequency.default_multiplier())
    }

    /// Check that every value is a non-negative finite number and that both
    /// percentages lie in 0–100.
    pub fn validate(&self) -> Result<(), ProposalError> {
        for (service, rate) in &self.rates {
            check_non_negative(&format!("rates.{service}"), *rate)?;
        }
        for (frequency, multiplier) in &self.frequency_multipliers {
            check_non_negative(&format!("frequency_multipliers.{frequency}"), *multiplier)?;
        }
        check_non_negative("labor_rate", self.labor_rate)?;
        check_percentage("overhead_percentage", self.overhead_percentage)?;
        check_percentage("margin_percentage", self.margin_percentage)?;
        Ok(())
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), ProposalError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProposalError::InvalidRate {
            field: field.to_string(),
            value,
        })
    }
}

fn check_percentage(field: &str, value: f64) -> Result<(), ProposalError> {
    check_non_negative(field, value)?;
    if value > 100.0 {
        return Err(ProposalError::PercentageOutOfRange {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// Builder for [`RateTable`].
#[derive(Debug)]
pub struct RateTableBuilder {
    table: RateTable,
}

impl RateTableBuilder {
    pub fn service_rate(mut self, service: ServiceType, rate: f64) -> Self {
        self.table.rates.insert(service, rate.max(0.0));
        self
    }

    pub fn frequency_multiplier(mut self, frequency: ServiceFrequency, multiplier: f64) -> Self {
        self.table
            .frequency_multipliers
            .insert(frequency, multiplier.max(0.0));
        self
    }

    pub fn labor_rate(mut self, rate: f64) -> Self {
        self.table.labor_rate = rate.max(0.0);
        self
    }

    pub fn overhead_percentage(mut self, pct: f64) -> Self {
        self.table.overhead_percentage = pct.clamp(0.0, 100.0);
        self
    }

    pub fn margin_percentage(mut self, pct: f64) -> Self {
        self.table.margin_percentage = pct.clamp(0.0, 100.0);
        self
    }

    /// Build the table, validating constraints.
    pub fn build(self) -> Result<RateTable, ProposalError> {
        self.table.validate()?;
        Ok(self.table)
    }
}

/// Controls how [`crate::layout::build_layout`] paginates and describes the
/// scope and pricing sections.
///
/// # Example
/// ```rust
/// use veliz_proposals::LayoutConfig;
///
/// let config = LayoutConfig::builder()
///     .first_page_rows(10)
///     .continuation_rows(16)
///     .build()
///     .unwrap();
/// assert_eq!(config.first_page_rows, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Scope rows on the first page. Default: 12.
    ///
    /// The first page also carries the section title and description, so it
    /// holds fewer rows than a continuation page.
    pub first_page_rows: usize,

    /// Scope rows on every following page. Default: 14.
    pub continuation_rows: usize,

    /// Description for a scope section that has only a table.
    pub scope_fallback_description: String,

    /// Description for a pricing section that has only a table.
    pub pricing_fallback_description: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            first_page_rows: DEFAULT_FIRST_PAGE_ROWS,
            continuation_rows: DEFAULT_CONTINUATION_ROWS,
            scope_fallback_description: DEFAULT_SCOPE_DESCRIPTION.to_string(),
            pricing_fallback_description: DEFAULT_PRICING_DESCRIPTION.to_string(),
        }
    }
}

impl LayoutConfig {
    /// Create a new builder for `LayoutConfig`.
    pub fn builder() -> LayoutConfigBuilder {
        LayoutConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`LayoutConfig`].
#[derive(Debug)]
pub struct LayoutConfigBuilder {
    config: LayoutConfig,
}

impl LayoutConfigBuilder {
    pub fn first_page_rows(mut self, n: usize) -> Self {
        self.config.first_page_rows = n.max(1);
        self
    }

    pub fn continuation_rows(mut self, n: usize) -> Self {
        self.config.continuation_rows = n.max(1);
        self
    }

    pub fn scope_fallback_description(mut self, text: impl Into<String>) -> Self {
        self.config.scope_fallback_description = text.into();
        self
    }

    pub fn pricing_fallback_description(mut self, text: impl Into<String>) -> Self {
        self.config.pricing_fallback_description = text.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<LayoutConfig, ProposalError> {
        let c = &self.config;
        if c.first_page_rows == 0 || c.continuation_rows == 0 {
            return Err(ProposalError::InvalidConfig(
                "Rows per page must be ≥ 1".into(),
            ));
        }
        if c.scope_fallback_description.trim().is_empty()
            || c.pricing_fallback_description.trim().is_empty()
        {
            return Err(ProposalError::InvalidConfig(
                "Fallback descriptions must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// The kind of cleaning being quoted. Window cleaning is priced per window,
/// every other service per square foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Residential,
    Commercial,
    Carpet,
    Window,
    Floor,
}

impl ServiceType {
    pub const ALL: [ServiceType; 5] = [
        ServiceType::Residential,
        ServiceType::Commercial,
        ServiceType::Carpet,
        ServiceType::Window,
        ServiceType::Floor,
    ];

    /// Rate used when a table does not name this service.
    pub fn default_rate(self) -> f64 {
        match self {
            ServiceType::Residential => 0.15,
            ServiceType::Commercial => 0.12,
            ServiceType::Carpet => 0.25,
            ServiceType::Window => 8.0,
            ServiceType::Floor => 0.35,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::Residential => "residential",
            ServiceType::Commercial => "commercial",
            ServiceType::Carpet => "carpet",
            ServiceType::Window => "window",
            ServiceType::Floor => "floor",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often the base service is performed.
///
/// Any key the form sends that is not one of the known cadences
/// deserializes to [`ServiceFrequency::Other`], which prices at 1.0×.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceFrequency {
    OneTime,
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    #[serde(other)]
    Other,
}

impl ServiceFrequency {
    pub const KNOWN: [ServiceFrequency; 5] = [
        ServiceFrequency::OneTime,
        ServiceFrequency::Weekly,
        ServiceFrequency::BiWeekly,
        ServiceFrequency::Monthly,
        ServiceFrequency::Quarterly,
    ];

    /// Multiplier used when a table does not name this frequency.
    pub fn default_multiplier(self) -> f64 {
        match self {
            ServiceFrequency::OneTime => 1.0,
            ServiceFrequency::Weekly => 0.8,
            ServiceFrequency::BiWeekly => 0.85,
            ServiceFrequency::Monthly => 0.9,
            ServiceFrequency::Quarterly => 0.95,
            ServiceFrequency::Other => 1.0,
        }
    }

    /// The cadence for a form key. Unknown keys map to
    /// [`ServiceFrequency::Other`], as in deserialization.
    pub fn from_key(key: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|f| f.as_str() == key)
            .unwrap_or(ServiceFrequency::Other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceFrequency::OneTime => "one_time",
            ServiceFrequency::Weekly => "weekly",
            ServiceFrequency::BiWeekly => "bi_weekly",
            ServiceFrequency::Monthly => "monthly",
            ServiceFrequency::Quarterly => "quarterly",
            ServiceFrequency::Other => "other",
        }
    }
}

impl fmt::Display for ServiceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
