//! Base-service price calculation.
//!
//! ```text
//! base      = window ? window_count × rate[window] : facility_size × rate[type]
//! hours     = window ? ⌈window_count / 10⌉           : ⌈facility_size / 1000⌉
//! adjusted  = base × multiplier[frequency]
//! total     = adjusted + hours × labor_rate + adjusted × (overhead% + margin%) / 100
//! range     = [total × 0.9, total × 1.1]
//! ```
//!
//! The band width and the production rates are fixed business constants, not
//! part of [`RateTable`]. Hours are whole numbers and must fit a `u32` at the
//! top of the band, which caps the facility size at roughly 2.8 billion
//! square feet.

use crate::config::{RateTable, ServiceFrequency, ServiceType};
use crate::error::ProposalError;
use crate::output::{Assumptions, HoursEstimate, PriceRange, PricingResult, ProductionRate};
use crate::pricing::details::ServiceDetails;
use crate::pricing::round_currency;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Lower edge of the quoted band as a fraction of the total.
pub const PRICE_BAND_LOW: f64 = 0.9;

/// Upper edge of the quoted band as a fraction of the total.
pub const PRICE_BAND_HIGH: f64 = 1.1;

/// Square feet a crew cleans per labor hour.
pub const SQFT_PER_HOUR: f64 = 1000.0;

/// Windows a crew cleans per labor hour.
pub const WINDOWS_PER_HOUR: u32 = 10;

/// Ratio between the upper and lower hours estimate.
pub const HOURS_SPREAD: f64 = 1.5;

/// Raw form input for a base-service quote.
///
/// Field names match the wizard's JSON so the struct deserializes directly
/// from a submitted form. Every field the form may omit is optional here;
/// [`calculate`] decides which omissions are errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    #[serde(default)]
    pub facility_size: Option<f64>,
    /// A blank string counts as missing; the wizard sends `""` for an
    /// untouched select.
    #[serde(default, deserialize_with = "blank_frequency_as_none")]
    pub service_frequency: Option<ServiceFrequency>,
    pub service_type: ServiceType,
    #[serde(default)]
    pub service_specific_data: Option<Map<String, Value>>,
}

impl PricingInput {
    pub fn new(service_type: ServiceType) -> Self {
        Self {
            facility_size: None,
            service_frequency: None,
            service_type,
            service_specific_data: None,
        }
    }

    pub fn facility_size(mut self, sqft: f64) -> Self {
        self.facility_size = Some(sqft);
        self
    }

    pub fn frequency(mut self, frequency: ServiceFrequency) -> Self {
        self.service_frequency = Some(frequency);
        self
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.service_specific_data
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

fn blank_frequency_as_none<'de, D>(deserializer: D) -> Result<Option<ServiceFrequency>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(ServiceFrequency::from_key))
}

/// Every intermediate figure of a calculation, before the band is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub labor_hours: u32,
    pub adjusted_price: f64,
    pub labor_cost: f64,
    pub overhead: f64,
    pub margin: f64,
    pub total: f64,
}

/// Input that passed validation, with service details read into their
/// typed variant.
struct ValidatedInput {
    facility_size: f64,
    frequency: ServiceFrequency,
    details: ServiceDetails,
}

/// Check the form fields in order; the first failure wins.
fn validate(input: &PricingInput) -> Result<ValidatedInput, ProposalError> {
    let facility_size = match input.facility_size {
        Some(size) if size.is_finite() && size > 0.0 => size,
        _ => return Err(ProposalError::FacilitySizeRequired),
    };
    let frequency = input
        .service_frequency
        .ok_or(ProposalError::FrequencyRequired)?;
    let data = match &input.service_specific_data {
        Some(data) if !data.is_empty() => data,
        _ => return Err(ProposalError::ServiceDetailsRequired),
    };
    let details = ServiceDetails::from_form(input.service_type, data)?;
    Ok(ValidatedInput {
        facility_size,
        frequency,
        details,
    })
}

/// `⌈hours × 1.5⌉` in integer arithmetic, `None` on overflow.
fn max_hours(hours: u32) -> Option<u32> {
    hours.checked_add(hours.div_ceil(2))
}

/// Hours to clean `sqft`, rejecting sizes whose hours band overflows.
fn area_labor_hours(sqft: f64) -> Result<u32, ProposalError> {
    let hours = (sqft / SQFT_PER_HOUR).ceil();
    if hours <= u32::MAX as f64 {
        let hours = hours as u32;
        if max_hours(hours).is_some() {
            return Ok(hours);
        }
    }
    Err(ProposalError::FacilitySizeTooLarge { facility_size: sqft })
}

/// Validate `input` and compute every intermediate figure.
pub fn calculate_breakdown(
    input: &PricingInput,
    rates: &RateTable,
) -> Result<PriceBreakdown, ProposalError> {
    let v = validate(input)?;
    let service_type = v.details.service_type();

    let (base_price, labor_hours) = match v.details.window_count() {
        Some(windows) => (
            windows as f64 * rates.rate(ServiceType::Window),
            windows.div_ceil(WINDOWS_PER_HOUR),
        ),
        None => (
            v.facility_size * rates.rate(service_type),
            area_labor_hours(v.facility_size)?,
        ),
    };

    let adjusted_price = base_price * rates.multiplier(v.frequency);
    let labor_cost = labor_hours as f64 * rates.labor_rate;
    let overhead = adjusted_price * rates.overhead_percentage / 100.0;
    let margin = adjusted_price * rates.margin_percentage / 100.0;
    let total = adjusted_price + labor_cost + overhead + margin;

    debug!(
        service = %service_type,
        frequency = %v.frequency,
        base_price,
        labor_hours,
        total,
        "priced base service"
    );

    Ok(PriceBreakdown {
        base_price,
        labor_hours,
        adjusted_price,
        labor_cost,
        overhead,
        margin,
        total,
    })
}

/// Compute the quoted price band, hours estimate and assumptions.
///
/// # Errors
/// Returns the first failing validation, in this order:
/// 1. [`ProposalError::FacilitySizeRequired`]
/// 2. [`ProposalError::FrequencyRequired`]
/// 3. [`ProposalError::ServiceDetailsRequired`]
/// 4. [`ProposalError::WindowCountRequired`] /
///    [`ProposalError::InvalidServiceDetails`]
///
/// An area-priced input that passes all four can still fail with
/// [`ProposalError::FacilitySizeTooLarge`].
///
/// # Example
/// ```rust
/// use veliz_proposals::{calculate, PricingInput, RateTable, ServiceFrequency, ServiceType};
///
/// let input = PricingInput::new(ServiceType::Commercial)
///     .facility_size(5000.0)
///     .frequency(ServiceFrequency::Weekly)
///     .detail("floors", 2);
/// let result = calculate(&input, &RateTable::default()).unwrap();
/// assert!(result.price_range.low <= result.price_range.high);
/// assert_eq!(result.hours_estimate.min, 5);
/// ```
pub fn calculate(input: &PricingInput, rates: &RateTable) -> Result<PricingResult, ProposalError> {
    let breakdown = calculate_breakdown(input, rates)?;
    let per_hour = if input.service_type == ServiceType::Window {
        WINDOWS_PER_HOUR as f64
    } else {
        SQFT_PER_HOUR
    };

    Ok(PricingResult {
        price_range: PriceRange {
            low: breakdown.total * PRICE_BAND_LOW,
            high: breakdown.total * PRICE_BAND_HIGH,
        },
        hours_estimate: HoursEstimate {
            min: breakdown.labor_hours,
            max: max_hours(breakdown.labor_hours).ok_or(ProposalError::FacilitySizeTooLarge {
                facility_size: input.facility_size.unwrap_or_default(),
            })?,
        },
        assumptions: Assumptions {
            labor_rate: rates.labor_rate,
            overhead_percentage: rates.overhead_percentage,
            margin_percentage: rates.margin_percentage,
            production_rate: ProductionRate {
                min: round_currency(per_hour / HOURS_SPREAD),
                max: per_hour,
            },
        },
    })
}
