//! Recovering sections the generator nested inside another section.
//!
//! Sometimes the add-ons list arrives as a sub-heading inside the scope
//! section, and the pricing notes as a sub-heading after the pricing table,
//! instead of under their own `#` headings. Rendering them in place would
//! put them on the wrong template page, so they are lifted out into
//! synthetic sections and removed from their host.
//!
//! This is a best-effort pass over loosely structured text. Callers only
//! run it when no explicit section of that kind exists; the patterns it
//! matches live in [`crate::patterns`].

use crate::content::sections::{join_trimmed, Section};
use crate::patterns::{self, PRICING_TABLE_TAG, SYNTHETIC_ADDONS_ID, SYNTHETIC_NOTES_ID};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A section lifted out of its host, and what is left of the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recovery {
    pub extracted: Section,
    /// The host section with the extracted lines removed.
    pub remainder: Section,
}

/// Lift an add-ons sub-list out of the scope section.
///
/// Finds the first line (outside any fence) matching an add-ons sub-heading
/// and takes the lines after it up to the next heading or fence. Returns
/// `None` when there is no such sub-heading or nothing under it.
pub fn recover_embedded_addons(scope: &Section) -> Option<Recovery> {
    let lines: Vec<&str> = scope.content.lines().collect();
    let header = find_outside_fences(&lines, 0, patterns::is_addons_header)?;
    let recovery = lift(scope, &lines, header, SYNTHETIC_ADDONS_ID)?;
    debug!(
        host = %scope.id,
        lines = recovery.extracted.content.lines().count(),
        "recovered embedded add-ons"
    );
    Some(recovery)
}

/// Lift a notes block that follows the pricing table out of the pricing
/// section.
///
/// Only text after the closing fence of the `veliz_pricing_table` block is
/// considered; a "Notes" heading above the table is left alone.
pub fn recover_embedded_notes(pricing: &Section) -> Option<Recovery> {
    let lines: Vec<&str> = pricing.content.lines().collect();
    let open = lines
        .iter()
        .position(|l| patterns::fence_marker(l) == Some(PRICING_TABLE_TAG))?;
    let close = open
        + 1
        + lines[open + 1..]
            .iter()
            .position(|l| patterns::fence_marker(l) == Some(""))?;
    let header = find_outside_fences(&lines, close + 1, patterns::is_notes_header)?;
    let recovery = lift(pricing, &lines, header, SYNTHETIC_NOTES_ID)?;
    debug!(
        host = %pricing.id,
        lines = recovery.extracted.content.lines().count(),
        "recovered embedded notes"
    );
    Some(recovery)
}

/// First index at or after `from` whose line satisfies `is_match` and is
/// not inside a fenced block.
fn find_outside_fences(lines: &[&str], from: usize, is_match: fn(&str) -> bool) -> Option<usize> {
    let mut in_fence = false;
    for (i, line) in lines.iter().enumerate().skip(from) {
        if patterns::fence_marker(line).is_some() {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence && is_match(line) {
            return Some(i);
        }
    }
    None
}

/// Split `host` at the sub-heading on line `header`: the body runs to the
/// next heading or fence start.
fn lift(host: &Section, lines: &[&str], header: usize, id: &str) -> Option<Recovery> {
    let end = lines[header + 1..]
        .iter()
        .position(|l| patterns::is_heading(l) || patterns::fence_marker(l).is_some())
        .map_or(lines.len(), |i| header + 1 + i);

    let body = join_trimmed(&lines[header + 1..end]);
    if body.is_empty() {
        return None;
    }

    let kept: Vec<&str> = lines[..header]
        .iter()
        .chain(&lines[end..])
        .copied()
        .collect();

    Some(Recovery {
        extracted: Section::new(id, Some(patterns::clean_heading(lines[header])), body),
        remainder: Section {
            content: join_trimmed(&kept),
            ..host.clone()
        },
    })
}
