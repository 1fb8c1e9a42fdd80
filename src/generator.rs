use tracing::{info, warn};

use crate::llm::CompletionClient;
use crate::sink::ResultSink;
use crate::types::{FeedItem, GeneratedRecord, Result, RunSummary};

fn generation_prompt(word_target: usize) -> String {
    format!("Scrie o postare Facebook de {word_target} cuvinte, ton cald, clar.")
}

/// Generate one record per resolvable selected index and append it to the
/// sink as soon as it exists.
///
/// Indices are 1-based and may repeat. An index that does not resolve is
/// skipped. A failed completion is logged and counted instead of aborting
/// the loop, so records produced before the failure are kept. Sink errors
/// still abort: persistence is not a degradable collaborator.
pub async fn generate(
    client: &dyn CompletionClient,
    sink: &mut dyn ResultSink,
    items: &[FeedItem],
    indices: &[usize],
    word_target: usize,
) -> Result<RunSummary> {
    let system = generation_prompt(word_target);
    let mut summary = RunSummary::default();

    for &index in indices {
        let Some(item) = index.checked_sub(1).and_then(|i| items.get(i)) else {
            warn!(index, "selected index does not resolve to an item");
            summary.skipped += 1;
            continue;
        };
        match client.complete(&system, &item.title).await {
            Ok(text) => {
                let record = GeneratedRecord::new(item, text);
                sink.push(&record).await?;
                summary.produced += 1;
            }
            Err(e) => {
                warn!(index, link = %item.link, error = %e, "content generation failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        produced = summary.produced,
        skipped = summary.skipped,
        failed = summary.failed,
        "generation finished"
    );
    Ok(summary)
}
