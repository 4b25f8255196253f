//! Error types for the veliz-proposals library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ProposalError`] is **blocking**. The caller supplied input that cannot
//!   be priced or priced against (missing facility size, an add-on quantity
//!   below the catalog minimum, a negative rate). Returned as
//!   `Err(ProposalError)` so the host UI can show a specific corrective
//!   message before anything is persisted.
//!
//! * [`TableParseError`] is **non-fatal**. An embedded `veliz_*_table` fence in
//!   AI-generated text could not be read. The content splitter logs it and
//!   treats the table as absent; the rest of the document still renders.
//!
//! Missing sections are neither: a title lookup that finds nothing returns
//! `None`.

use thiserror::Error;

/// All blocking errors returned by the veliz-proposals library.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProposalError {
    // ── Pricing input ─────────────────────────────────────────────────────
    /// `facility_size` was missing, zero, negative or not a number.
    #[error("facility size required")]
    FacilitySizeRequired,

    /// `facility_size` is so large its labor-hour band does not fit a `u32`.
    #[error("facility size {facility_size} is too large to estimate labor hours")]
    FacilitySizeTooLarge { facility_size: f64 },

    /// `service_frequency` was missing or blank.
    #[error("frequency required")]
    FrequencyRequired,

    /// `service_specific_data` was missing or an empty object.
    #[error("service details required")]
    ServiceDetailsRequired,

    /// Window cleaning was requested without a positive `window_count`.
    #[error("window count required")]
    WindowCountRequired,

    /// `service_specific_data` did not match the schema for its service type.
    #[error("invalid service details for {service_type}: {detail}")]
    InvalidServiceDetails {
        service_type: String,
        detail: String,
    },

    // ── Rate table ────────────────────────────────────────────────────────
    /// A rate, multiplier or percentage was negative, NaN or infinite.
    #[error("invalid rate table: {field} must be a non-negative finite number, got {value}")]
    InvalidRate { field: String, value: f64 },

    /// A percentage exceeded 100.
    #[error("invalid rate table: {field} must be between 0 and 100, got {value}")]
    PercentageOutOfRange { field: String, value: f64 },

    // ── Add-ons ───────────────────────────────────────────────────────────
    /// A catalog entry violated its own invariants.
    #[error("invalid add-on '{sku}': {reason}")]
    InvalidAddon { sku: String, reason: String },

    /// Two catalog entries share a sku.
    #[error("duplicate add-on sku '{sku}' in catalog")]
    DuplicateSku { sku: String },

    /// No catalog entry carries the requested sku.
    #[error("unknown add-on sku '{sku}'")]
    UnknownSku { sku: String },

    /// The catalog entry is inactive and cannot be attached to a proposal.
    #[error("add-on '{sku}' is not active")]
    InactiveAddon { sku: String },

    /// Requested quantity is below the entry's minimum.
    #[error("add-on '{sku}' requires a quantity of at least {min_qty}, got {qty}")]
    QuantityBelowMinimum { sku: String, qty: f64, min_qty: f64 },

    /// Requested billing frequency is not one the entry offers.
    #[error("add-on '{sku}' cannot be billed {frequency}")]
    FrequencyNotOffered { sku: String, frequency: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ProposalError {
    /// True for the input-validation failures raised by
    /// [`crate::pricing::calculate`], which the host shows next to the form.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::FacilitySizeRequired
                | Self::FacilitySizeTooLarge { .. }
                | Self::FrequencyRequired
                | Self::ServiceDetailsRequired
                | Self::WindowCountRequired
                | Self::InvalidServiceDetails { .. }
        )
    }
}

/// A non-fatal failure to read an embedded table fence.
///
/// Never returned from the public splitter API; surfaced only through logs
/// and the `try_parse_*` helpers in [`crate::content::tables`].
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum TableParseError {
    /// No fence with the requested tag exists in the content.
    #[error("no `{tag}` fence found")]
    FenceMissing { tag: String },

    /// The fence was opened but never closed.
    #[error("`{tag}` fence is not closed")]
    Unterminated { tag: String },

    /// The fence body is not valid JSON for the expected shape.
    #[error("`{tag}` fence holds malformed JSON: {detail}")]
    MalformedJson { tag: String, detail: String },
}
