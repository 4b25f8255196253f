//! Embedded JSON tables and section descriptions.
//!
//! The generator emits structured tables as fenced blocks:
//!
//! ````text
//! ```veliz_scope_table
//! {"rows": [{"area": "Lobby", "frequency": "Daily", "costPerVisit": 45}]}
//! ```
//! ````
//!
//! A malformed block is never fatal. The public `parse_*` functions log the
//! [`TableParseError`] and return `None`, and the template renders no table.

use crate::config::{DEFAULT_PRICING_DESCRIPTION, DEFAULT_SCOPE_DESCRIPTION};
use crate::content::sections::Section;
use crate::error::TableParseError;
use crate::patterns::{self, PRICING_TABLE_TAG, SCOPE_TABLE_TAG};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// A table cell the generator may write either as a number or as
/// preformatted text such as `"$45.00"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric value, reading text like `"$1,250.50"` when possible.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(t) => {
                let cleaned: String = t
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                    .collect();
                cleaned.parse().ok()
            }
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{n:.2}"),
            CellValue::Text(t) => f.write_str(t),
        }
    }
}

/// One serviced area of the scope table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRow {
    pub area: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub cost_per_visit: Option<CellValue>,
    #[serde(default)]
    pub monthly_cost: Option<CellValue>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeTable {
    pub rows: Vec<ScopeRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRow {
    #[serde(alias = "item", alias = "label")]
    pub service: String,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub quantity: Option<CellValue>,
    #[serde(default)]
    pub rate: Option<CellValue>,
    #[serde(default, alias = "price", alias = "total")]
    pub amount: Option<CellValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingSummary {
    #[serde(default)]
    pub subtotal: Option<CellValue>,
    #[serde(default)]
    pub tax: Option<CellValue>,
    #[serde(default)]
    pub total: Option<CellValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingTable {
    pub rows: Vec<PricingRow>,
    #[serde(default)]
    pub summary: Option<PricingSummary>,
}

/// Body of the first fence tagged `tag`.
pub fn fence_body(content: &str, tag: &str) -> Result<String, TableParseError> {
    let mut lines = content.lines();
    if !lines
        .by_ref()
        .any(|line| patterns::fence_marker(line) == Some(tag))
    {
        return Err(TableParseError::FenceMissing {
            tag: tag.to_string(),
        });
    }
    let mut body = Vec::new();
    for line in lines {
        if patterns::fence_marker(line) == Some("") {
            return Ok(body.join("\n"));
        }
        body.push(line);
    }
    Err(TableParseError::Unterminated {
        tag: tag.to_string(),
    })
}

fn try_parse<T: DeserializeOwned>(content: &str, tag: &str) -> Result<T, TableParseError> {
    let body = fence_body(content, tag)?;
    serde_json::from_str(&body).map_err(|e| TableParseError::MalformedJson {
        tag: tag.to_string(),
        detail: e.to_string(),
    })
}

fn parse_or_log<T: DeserializeOwned>(content: &str, tag: &str) -> Option<T> {
    match try_parse(content, tag) {
        Ok(table) => Some(table),
        Err(e @ TableParseError::FenceMissing { .. }) => {
            debug!("{}", e);
            None
        }
        Err(e) => {
            warn!("Ignoring table: {}", e);
            None
        }
    }
}

/// Parse the first `veliz_scope_table` fence, reporting why it failed.
pub fn try_parse_scope_table(content: &str) -> Result<ScopeTable, TableParseError> {
    try_parse(content, SCOPE_TABLE_TAG)
}

/// Parse the first `veliz_pricing_table` fence, reporting why it failed.
pub fn try_parse_pricing_table(content: &str) -> Result<PricingTable, TableParseError> {
    try_parse(content, PRICING_TABLE_TAG)
}

/// Parse the first `veliz_scope_table` fence. `None` when the fence is
/// missing, unterminated or not valid JSON.
pub fn parse_scope_table(content: &str) -> Option<ScopeTable> {
    parse_or_log(content, SCOPE_TABLE_TAG)
}

/// Parse the first `veliz_pricing_table` fence. `None` when the fence is
/// missing, unterminated or not valid JSON.
pub fn parse_pricing_table(content: &str) -> Option<PricingTable> {
    parse_or_log(content, PRICING_TABLE_TAG)
}

/// Fallback description for a table-only section with fence `tag`.
pub fn default_description(tag: &str) -> &'static str {
    if tag == PRICING_TABLE_TAG {
        DEFAULT_PRICING_DESCRIPTION
    } else {
        DEFAULT_SCOPE_DESCRIPTION
    }
}

/// Free text of `section` that introduces its `tag` table, using the
/// built-in fallback for a table-only section.
pub fn extract_description(section: &Section, tag: &str) -> String {
    extract_description_or(section, tag, default_description(tag))
}

/// Like [`extract_description`] with a caller-chosen fallback.
///
/// Lines before the fence opens that are neither headings nor bullets are
/// trimmed and joined with single spaces. Without a fence, every such line
/// outside other fences counts and the result may be empty.
pub fn extract_description_or(section: &Section, tag: &str, fallback: &str) -> String {
    let mut parts = Vec::new();
    let mut in_fence = false;
    let mut has_table = false;

    for line in section.content.lines() {
        if let Some(marker) = patterns::fence_marker(line) {
            if !in_fence && marker == tag {
                has_table = true;
                break;
            }
            in_fence = !in_fence;
            continue;
        }
        let text = line.trim();
        if in_fence || text.is_empty() || patterns::is_heading(line) || patterns::is_bullet(line) {
            continue;
        }
        parts.push(text);
    }

    if parts.is_empty() && has_table {
        fallback.to_string()
    } else {
        parts.join(" ")
    }
}
