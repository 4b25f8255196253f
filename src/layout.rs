//! Turning one generated proposal document into template-ready pieces.
//!
//! The template renderers want fixed slots (introduction, scope, add-ons,
//! pricing, notes) plus the scope table already cut into pages. This module
//! runs the content steps in order and fills those slots, tolerating every
//! way the generator is known to deviate from the expected outline.

use crate::config::LayoutConfig;
use crate::content::normalize_document;
use crate::content::paginate::paginate_scope_table;
use crate::content::recover::{recover_embedded_addons, recover_embedded_notes, Recovery};
use crate::content::sections::{position_by_title, split_into_sections, Section};
use crate::content::tables::{extract_description_or, parse_pricing_table, parse_scope_table};
use crate::output::ProposalLayout;
use crate::patterns::{
    ADDON_TITLES, INTRODUCTION_TITLES, NOTES_TITLES, PRICING_TABLE_TAG, PRICING_TITLES,
    SCOPE_TABLE_TAG, SCOPE_TITLES, SYNTHETIC_ADDONS_ID, SYNTHETIC_NOTES_ID,
};
use tracing::{debug, info};

/// Split, repair and paginate a generated proposal document.
///
/// Never fails: a document with no recognisable sections yields a layout
/// whose slots are all `None`.
///
/// # Example
/// ```rust
/// use veliz_proposals::{build_layout, LayoutConfig};
///
/// let doc = "# Scope of Service\nNightly cleaning.\nAdd-ons\n- Carpet extraction\n\n# Pricing\n$900/month";
/// let layout = build_layout(doc, &LayoutConfig::default());
/// assert_eq!(layout.addons.unwrap().id, "synthetic-addons");
/// assert_eq!(layout.sections.len(), 3);
/// ```
pub fn build_layout(document: &str, config: &LayoutConfig) -> ProposalLayout {
    // ── Step 1: Normalise and split ──────────────────────────────────────
    let normalized = normalize_document(document);
    let mut sections = split_into_sections(&normalized);
    debug!("Split document into {} sections", sections.len());

    // ── Step 2: Recover nested add-ons ───────────────────────────────────
    if position_by_title(&sections, ADDON_TITLES).is_none() {
        if let Some(i) = find_section(&sections, SCOPE_TITLES, SCOPE_TABLE_TAG) {
            if let Some(recovery) = recover_embedded_addons(&sections[i]) {
                info!("Recovered add-ons nested under '{}'", sections[i].id);
                splice(&mut sections, i, recovery);
            }
        }
    }

    // ── Step 3: Recover trailing pricing notes ───────────────────────────
    if position_by_title(&sections, NOTES_TITLES).is_none() {
        if let Some(i) = find_section(&sections, PRICING_TITLES, PRICING_TABLE_TAG) {
            if let Some(recovery) = recover_embedded_notes(&sections[i]) {
                info!("Recovered notes nested under '{}'", sections[i].id);
                splice(&mut sections, i, recovery);
            }
        }
    }

    // ── Step 4: Describe table sections ──────────────────────────────────
    let scope_idx = find_section(&sections, SCOPE_TITLES, SCOPE_TABLE_TAG);
    let pricing_idx = find_section(&sections, PRICING_TITLES, PRICING_TABLE_TAG);
    if let Some(i) = scope_idx {
        let text = extract_description_or(
            &sections[i],
            SCOPE_TABLE_TAG,
            &config.scope_fallback_description,
        );
        sections[i].description = non_empty(text);
    }
    if let Some(i) = pricing_idx {
        let text = extract_description_or(
            &sections[i],
            PRICING_TABLE_TAG,
            &config.pricing_fallback_description,
        );
        sections[i].description = non_empty(text);
    }

    // ── Step 5: Parse and paginate tables ────────────────────────────────
    let scope_table = scope_idx.and_then(|i| parse_scope_table(&sections[i].content));
    let scope_pages = paginate_scope_table(scope_table.as_ref(), config);
    let pricing_table = pricing_idx.and_then(|i| parse_pricing_table(&sections[i].content));
    debug!(
        "Scope table: {} rows on {} pages",
        scope_table.as_ref().map_or(0, |t| t.rows.len()),
        scope_pages.len()
    );

    // ── Step 6: Fill slots ───────────────────────────────────────────────
    let slot = |idx: Option<usize>| idx.map(|i| sections[i].clone());
    let introduction = slot(position_by_title(&sections, INTRODUCTION_TITLES));
    let addons = slot(
        position_by_title(&sections, ADDON_TITLES)
            .or_else(|| sections.iter().position(|s| s.id == SYNTHETIC_ADDONS_ID)),
    );
    let notes = slot(
        position_by_title(&sections, NOTES_TITLES)
            .or_else(|| sections.iter().position(|s| s.id == SYNTHETIC_NOTES_ID)),
    );
    let scope = slot(scope_idx);
    let pricing = slot(pricing_idx);

    ProposalLayout {
        sections,
        introduction,
        scope,
        addons,
        pricing,
        notes,
        scope_pages,
        pricing_table,
    }
}

/// A section by title, or failing that the first section that carries the
/// table fence `tag`.
fn find_section(sections: &[Section], titles: &[&str], tag: &str) -> Option<usize> {
    position_by_title(sections, titles).or_else(|| sections.iter().position(|s| s.has_fence(tag)))
}

/// Replace the host at `i` with its remainder and insert the lifted section
/// right after it.
fn splice(sections: &mut Vec<Section>, i: usize, recovery: Recovery) {
    sections[i] = recovery.remainder;
    sections.insert(i + 1, recovery.extracted);
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
