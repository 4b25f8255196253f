//! Content splitting for generated proposal documents.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own and [`crate::layout`] only composes them.
//!
//! ## Data Flow
//!
//! ```text
//! normalize ──▶ sections ──▶ recover ──▶ tables ──▶ paginate
//! (cleanup)     (headings)   (nesting)   (JSON)     (pages)
//! ```
//!
//! 1. [`normalize`]: strip wrappers and invisible characters
//! 2. [`sections`]: split at headings, look sections up by title
//! 3. [`recover`]: lift add-ons and notes nested in the wrong section
//! 4. [`tables`]: read `veliz_*_table` fences and section descriptions
//! 5. [`paginate`]: chunk table rows into pages
//!
//! Nothing here returns an error: the input is untrusted generated text,
//! and every step degrades to "nothing found" instead.

pub mod normalize;
pub mod paginate;
pub mod recover;
pub mod sections;
pub mod tables;

pub use normalize::normalize_document;
pub use paginate::{paginate_rows, paginate_scope_table};
pub use recover::{recover_embedded_addons, recover_embedded_notes, Recovery};
pub use sections::{lookup_by_title, position_by_title, split_into_sections, Section};
pub use tables::{
    extract_description, extract_description_or, parse_pricing_table, parse_scope_table,
    CellValue, PricingRow, PricingSummary, PricingTable, ScopeRow, ScopeTable,
};
