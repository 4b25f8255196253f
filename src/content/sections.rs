//! Splitting a proposal document into titled sections.

use crate::patterns::{self, OVERVIEW_TITLE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A titled block of the generated proposal, located by heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Body text without the heading line.
    pub content: String,
}

impl Section {
    pub fn new(id: impl Into<String>, title: Option<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title,
            description: None,
            content: content.into(),
        }
    }

    /// True when the content holds a fence whose info string is `tag`.
    pub fn has_fence(&self, tag: &str) -> bool {
        self.content
            .lines()
            .any(|line| patterns::fence_marker(line) == Some(tag))
    }

    /// Case-insensitive, whitespace-trimmed title comparison.
    pub fn title_matches(&self, candidate: &str) -> bool {
        self.title
            .as_deref()
            .is_some_and(|t| t.trim().to_lowercase() == candidate.trim().to_lowercase())
    }
}

/// Split `document` at every `#`, `##` or `###` heading.
///
/// Text between two headings, fenced blocks included, belongs to the first.
/// Heading-like lines inside a fence never split, except that a heading
/// closes a `veliz_*_table` fence left unterminated. Non-blank text before the
/// first heading becomes an "Overview" section. Sections come back in
/// document order.
///
/// ```rust
/// use veliz_proposals::split_into_sections;
///
/// let doc = "# About Our Company\nFamily owned.\n\n# Scope of Service\nLobby, nightly.";
/// let sections = split_into_sections(doc);
/// assert_eq!(sections.len(), 2);
/// assert_eq!(sections[0].title.as_deref(), Some("About Our Company"));
/// assert_eq!(sections[1].content, "Lobby, nightly.");
/// ```
pub fn split_into_sections(document: &str) -> Vec<Section> {
    let mut ids = IdAllocator::default();
    let mut sections = Vec::new();
    let mut title: Option<String> = None;
    let mut body: Vec<&str> = Vec::new();
    let mut open_fence: Option<&str> = None;

    for line in document.lines() {
        if let Some(info) = patterns::fence_marker(line) {
            open_fence = match open_fence {
                Some(_) => None,
                None => Some(info),
            };
            body.push(line);
            continue;
        }
        // A table body is JSON and never holds a heading: the table was cut
        // off, so the heading ends it.
        if open_fence.is_some_and(patterns::is_table_tag)
            && patterns::section_heading(line).is_some()
        {
            open_fence = None;
        }
        let heading = if open_fence.is_some() {
            None
        } else {
            patterns::section_heading(line).filter(|t| !t.is_empty())
        };
        match heading {
            Some(next) => {
                flush(&mut sections, &mut ids, title.take(), &body);
                body.clear();
                title = Some(next);
            }
            None => body.push(line),
        }
    }
    flush(&mut sections, &mut ids, title, &body);
    sections
}

fn flush(sections: &mut Vec<Section>, ids: &mut IdAllocator, title: Option<String>, body: &[&str]) {
    let content = join_trimmed(body);
    let title = match title {
        Some(t) => t,
        // Leading text before any heading
        None if content.is_empty() => return,
        None => OVERVIEW_TITLE.to_string(),
    };
    let id = ids.next(&title);
    sections.push(Section::new(id, Some(title), content));
}

/// Join lines, dropping blank lines at either end.
pub(crate) fn join_trimmed(lines: &[&str]) -> String {
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}

/// Hands out slug ids, suffixing repeats with `-2`, `-3`, …
#[derive(Default)]
struct IdAllocator {
    seen: HashMap<String, usize>,
}

impl IdAllocator {
    fn next(&mut self, title: &str) -> String {
        let slug = slugify(title);
        let count = self.seen.entry(slug.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            slug
        } else {
            format!("{slug}-{count}")
        }
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug.to_string()
    }
}

/// Index of the first section whose title matches a candidate, trying the
/// candidates in order.
pub fn position_by_title(sections: &[Section], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|c| sections.iter().position(|s| s.title_matches(c)))
}

/// The first section whose title matches a candidate, trying the candidates
/// in order. `None` is an ordinary outcome: the generator does not emit
/// every section for every proposal.
pub fn lookup_by_title<'a>(sections: &'a [Section], candidates: &[&str]) -> Option<&'a Section> {
    position_by_title(sections, candidates).map(|i| &sections[i])
}
