//! Splitting table rows into page-sized chunks.

use crate::config::LayoutConfig;
use crate::content::tables::{ScopeRow, ScopeTable};

/// Chunk `rows` into pages: the first page holds up to `first_page_limit`
/// rows, every later page up to `continuation_limit`.
///
/// Empty input yields no pages at all, not one empty page. Limits below 1
/// are treated as 1.
///
/// ```rust
/// use veliz_proposals::paginate_rows;
///
/// let rows: Vec<u32> = (1..=13).collect();
/// let pages = paginate_rows(&rows, 12, 14);
/// assert_eq!(pages.len(), 2);
/// assert_eq!(pages[1], vec![13]);
/// ```
pub fn paginate_rows<T: Clone>(
    rows: &[T],
    first_page_limit: usize,
    continuation_limit: usize,
) -> Vec<Vec<T>> {
    if rows.is_empty() {
        return Vec::new();
    }
    let first = first_page_limit.max(1);
    if rows.len() <= first {
        return vec![rows.to_vec()];
    }
    let (head, rest) = rows.split_at(first);
    std::iter::once(head)
        .chain(rest.chunks(continuation_limit.max(1)))
        .map(<[T]>::to_vec)
        .collect()
}

/// Paginate a parsed scope table with the configured limits. An absent
/// table yields no pages.
pub fn paginate_scope_table(table: Option<&ScopeTable>, config: &LayoutConfig) -> Vec<Vec<ScopeRow>> {
    table.map_or_else(Vec::new, |t| {
        paginate_rows(&t.rows, config.first_page_rows, config.continuation_rows)
    })
}
