//! # veliz-proposals
//!
//! Pricing and document layout for cleaning-services proposals.
//!
//! ## Why this crate?
//!
//! A proposal is assembled from two very different inputs: a wizard form
//! describing the facility, and a long markdown document written by a
//! content generator. Both need deterministic processing before anything is
//! stored or rendered. The form has to become a defensible price, and the
//! generated text has to land in the right template slots even when the
//! generator nests sections in the wrong place or emits a broken table.
//!
//! ## Overview
//!
//! ```text
//! form input ─▶ pricing::calculate ─▶ PricingResult ─┐
//! add-on catalog ─▶ AddonLine[] ─────────────────────┴▶ summarize_monthly
//!
//! generated text ─▶ normalize ─▶ sections ─▶ recover ─▶ tables ─▶ paginate
//!                   └──────────────── layout::build_layout ──────────────┘
//! ```
//!
//! Every operation is a pure, synchronous function: identical input gives
//! identical output, so results are safe to cache.
//!
//! ## Quick Start
//!
//! ```rust
//! use veliz_proposals::{
//!     build_layout, calculate, LayoutConfig, PricingInput, RateTable, ServiceFrequency,
//!     ServiceType,
//! };
//!
//! let input = PricingInput::new(ServiceType::Window)
//!     .facility_size(2400.0)
//!     .frequency(ServiceFrequency::Monthly)
//!     .detail("window_count", 50);
//! let price = calculate(&input, &RateTable::default()).unwrap();
//! assert_eq!(price.hours_estimate.min, 5);
//!
//! let layout = build_layout("# Pricing\nSee below.", &LayoutConfig::default());
//! assert!(layout.pricing.is_some());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `proposal` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! veliz-proposals = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod content;
pub mod error;
pub mod layout;
pub mod output;
pub mod patterns;
pub mod pricing;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    LayoutConfig, LayoutConfigBuilder, RateTable, RateTableBuilder, ServiceFrequency, ServiceType,
};
pub use content::{
    extract_description, lookup_by_title, paginate_rows, parse_pricing_table, parse_scope_table,
    recover_embedded_addons, recover_embedded_notes, split_into_sections, PricingTable, Recovery,
    ScopeRow, ScopeTable, Section,
};
pub use error::{ProposalError, TableParseError};
pub use layout::build_layout;
pub use output::{
    Assumptions, HoursEstimate, MonthlySummary, OneTimeCharge, PriceRange, PricingResult,
    ProductionRate, ProposalLayout,
};
pub use pricing::{
    amortize_addon, calculate, summarize_monthly, total_monthly, AddonCatalog, AddonCatalogEntry,
    AddonFrequency, AddonLine, BasePricing, PricingInput, ServiceDetails,
};
