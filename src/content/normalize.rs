//! Normalisation: deterministic cleanup of generated proposal text before
//! it is split.
//!
//! Section splitting keys on lines that begin with `#`, so anything that
//! hides the start or end of a line from the heading pattern has to go
//! first:
//!
//! * a lone `\r` joins a heading onto the previous line,
//! * a zero-width space or BOM in front of `#` stops the line counting as a
//!   heading at all,
//! * a ` ```markdown ` wrapper around the whole answer turns every heading
//!   into fenced code the splitter skips.
//!
//! Trailing spaces and long blank runs are dropped so the section bodies
//! compare equal across regenerations.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that render as nothing but break pattern matching.
const INVISIBLE: [char; 6] = [
    '\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}', '\u{00AD}',
];

/// Apply the normalisation rules in order:
/// 1. Unify line breaks to `\n`
/// 2. Strip an outer ` ```markdown ` / ` ```md ` wrapper
/// 3. Clean each line: drop invisible characters and trailing whitespace
/// 4. Collapse runs of blank lines down to one
pub fn normalize_document(input: &str) -> String {
    let s = unify_line_breaks(input);
    let s = strip_outer_fence(&s);
    let s = clean_lines(&s);
    collapse_blank_lines(&s)
}

// ── Rule 1: Unify line breaks ────────────────────────────────────────────────

static RE_LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").unwrap());

fn unify_line_breaks(input: &str) -> String {
    RE_LINE_BREAK.replace_all(input, "\n").into_owned()
}

// ── Rule 2: Strip outer markdown fence ───────────────────────────────────────
//
// Only an explicit `markdown`/`md` info string counts. A bare ``` at the
// start of the text may just as well open a table fence.

static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:markdown|md)[ \t]*\n(.*)\n```\s*$").unwrap());

fn strip_outer_fence(input: &str) -> String {
    match RE_OUTER_FENCE.captures(input.trim()) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}

// ── Rule 3: Clean each line ──────────────────────────────────────────────────

fn clean_lines(input: &str) -> String {
    input.split('\n').map(clean_line).collect::<Vec<_>>().join("\n")
}

fn clean_line(line: &str) -> String {
    let visible: String = line.chars().filter(|c| !INVISIBLE.contains(c)).collect();
    visible.trim_end().to_string()
}

// ── Rule 4: Collapse blank lines ─────────────────────────────────────────────

static RE_BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_RUN.replace_all(input, "\n\n").into_owned()
}
