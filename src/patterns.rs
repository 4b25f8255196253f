//! Every title spelling, fence tag and line pattern the content splitter
//! relies on.
//!
//! The generator that writes proposal text is not held to a schema: the same
//! section shows up as "Add-ons", "Additional Services" or "Addons", and the
//! add-ons list is sometimes nested under the scope heading instead of
//! getting its own. Keeping every pattern here means a new spelling is a
//! one-line change, and the tests below pin down exactly what each pattern
//! accepts without going through the splitter.

use once_cell::sync::Lazy;
use regex::Regex;

/// Fence info string for the per-area scope table.
pub const SCOPE_TABLE_TAG: &str = "veliz_scope_table";

/// Fence info string for the pricing table.
pub const PRICING_TABLE_TAG: &str = "veliz_pricing_table";

/// Title given to text that appears before the first heading.
pub const OVERVIEW_TITLE: &str = "Overview";

/// Id of an add-ons section lifted out of the scope section.
pub const SYNTHETIC_ADDONS_ID: &str = "synthetic-addons";

/// Id of a notes section lifted out of the pricing section.
pub const SYNTHETIC_NOTES_ID: &str = "synthetic-notes";

// ── Title candidates (tried in order) ────────────────────────────────────

pub const INTRODUCTION_TITLES: &[&str] = &[
    "Introduction",
    "About Our Company",
    "About Us",
    "Company Overview",
    "Executive Summary",
    OVERVIEW_TITLE,
];

pub const SCOPE_TITLES: &[&str] = &[
    "Scope of Service",
    "Scope of Services",
    "Scope of Work",
    "Service Scope",
    "Scope",
];

pub const ADDON_TITLES: &[&str] = &[
    "Add-ons",
    "Additional Services",
    "Addons",
    "Add Ons",
    "Additional Services (To Be Invoiced)",
    "Optional Add-ons",
];

pub const PRICING_TITLES: &[&str] = &[
    "Pricing",
    "Investment",
    "Your Investment",
    "Pricing Summary",
    "Pricing & Investment",
    "Pricing and Investment",
];

pub const NOTES_TITLES: &[&str] = &["Notes", "Pricing Notes", "Important Notes", "Additional Notes"];

// ── Line patterns ────────────────────────────────────────────────────────

/// A heading that starts a new section: one to three `#`.
static RE_SECTION_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(#{1,3})[ \t]+(.*?)[ \t]*$").unwrap());

/// Any markdown heading, including the deeper levels that stay inside a
/// section.
static RE_ANY_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}#{1,6}[ \t]+\S").unwrap());

static RE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:[-*+•]|\d+[.)])\s+").unwrap());

/// An add-ons sub-heading, bare or decorated as `## …`, `**…**` or `…:`.
static RE_ADDONS_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:#{1,6}\s*)?(?:\*\*|__)?\s*(?:optional\s+)?(?:add[- ]?ons|additional\s+services(?:\s*\(?\s*to\s+be\s+invoiced\s*\)?)?)\s*:?\s*(?:\*\*|__)?\s*:?\s*$",
    )
    .unwrap()
});

/// A notes sub-heading following the pricing table.
static RE_NOTES_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:#{1,6}\s*)?(?:\*\*|__)?\s*(?:(?:pricing|important|additional)\s+)?notes\s*:?\s*(?:\*\*|__)?\s*:?\s*$",
    )
    .unwrap()
});

/// If `line` starts a section, the cleaned heading text.
pub fn section_heading(line: &str) -> Option<String> {
    RE_SECTION_HEADING
        .captures(line)
        .map(|caps| clean_heading(&caps[2]))
}

/// True for a markdown heading of any level.
pub fn is_heading(line: &str) -> bool {
    RE_ANY_HEADING.is_match(line)
}

pub fn is_bullet(line: &str) -> bool {
    RE_BULLET.is_match(line)
}

pub fn is_addons_header(line: &str) -> bool {
    RE_ADDONS_HEADER.is_match(line)
}

pub fn is_notes_header(line: &str) -> bool {
    RE_NOTES_HEADER.is_match(line)
}

/// True for the info string of a structured table fence.
pub fn is_table_tag(info: &str) -> bool {
    info == SCOPE_TABLE_TAG || info == PRICING_TABLE_TAG
}

/// If `line` is a code-fence marker, the info string after the backticks
/// (empty for a bare marker).
pub fn fence_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    trimmed
        .strip_prefix("```")
        .or_else(|| trimmed.strip_prefix("~~~"))
        .map(|rest| rest.trim_start_matches(['`', '~']).trim())
}

/// Strip heading markers, emphasis and a trailing colon from heading text.
pub fn clean_heading(text: &str) -> String {
    let mut t = text
        .trim()
        .trim_start_matches('#')
        .trim_end_matches('#')
        .trim()
        .trim_end_matches(':')
        .trim();
    for marker in ["**", "__"] {
        if let Some(inner) = t.strip_prefix(marker).and_then(|s| s.strip_suffix(marker)) {
            t = inner.trim();
        }
    }
    t.trim_end_matches(':').trim().to_string()
}
