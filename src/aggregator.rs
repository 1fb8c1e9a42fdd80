use std::collections::HashSet;

use tracing::debug;

use crate::types::FeedItem;

pub const DEFAULT_MAX_ARTICLES: usize = 60;

/// Merge per-source item lists into one ranked candidate list.
///
/// Order of operations: flatten (input order is the only tiebreak), drop
/// items without a title or link, dedup by link keeping the first occurrence,
/// sort by `published_at` descending, truncate to `max_articles`.
///
/// Dates are compared as raw strings. Feeds emit a mix of RFC 2822 and ISO
/// 8601 stamps, so the ordering is not calendar-accurate across sources; a
/// missing date sorts like an empty string, i.e. last.
pub fn aggregate(lists: Vec<Vec<FeedItem>>, max_articles: usize) -> Vec<FeedItem> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut items: Vec<FeedItem> = Vec::new();

    for item in lists.into_iter().flatten() {
        if item.title.is_empty() || item.link.is_empty() {
            continue;
        }
        if !seen.insert(item.link.clone()) {
            debug!(link = %item.link, "dropping duplicate item");
            continue;
        }
        items.push(item);
    }

    // Stable sort, so equal dates keep their flattened order.
    items.sort_by(|a, b| {
        let a_date = a.published_at.as_deref().unwrap_or("");
        let b_date = b.published_at.as_deref().unwrap_or("");
        b_date.cmp(&a_date)
    });

    items.truncate(max_articles);
    items
}
