use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::llm::CompletionClient;
use crate::types::{FeedItem, Result};

/// At most this many items are ever selected for generation.
pub const MAX_SELECTED: usize = 3;

const SELECT_SYSTEM_PROMPT: &str =
    "Alege 3 știri relevante psihologic și întoarce doar numerele lor separate prin virgulă.";

/// One numbered line per candidate so the model can answer with indices.
pub fn build_listing(items: &[FeedItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            format!(
                "{}. [{}] \"{}\" — {}",
                idx + 1,
                item.source,
                item.title,
                item.link
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pull the first runs of digits out of the model's reply, permissively.
///
/// The model is told to answer like "1, 2, 3" but is not trusted to: prose,
/// too few numbers or plain garbage all degrade to a shorter (possibly
/// empty) selection. Duplicates are kept; a run too large for `usize` takes
/// up one of the slots and is dropped, like any other unresolvable index.
pub fn parse_indices(raw: &str) -> Vec<usize> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("digit pattern"));
    digits
        .find_iter(raw)
        .take(MAX_SELECTED)
        .filter_map(|m| m.as_str().parse::<usize>().ok())
        .collect()
}

/// Ask the model to pick the most relevant entries. Returns 1-based indices
/// into `items`, at most [`MAX_SELECTED`] of them; indices are not checked
/// against the list here.
pub async fn select(client: &dyn CompletionClient, items: &[FeedItem]) -> Result<Vec<usize>> {
    let listing = build_listing(items);
    let reply = client.complete(SELECT_SYSTEM_PROMPT, &listing).await?;
    let indices = parse_indices(&reply);
    info!(reply = %reply.trim(), selected = ?indices, "selection complete");
    Ok(indices)
}
