use tracing::info;

use crate::aggregator::aggregate;
use crate::fetcher::FeedFetcher;
use crate::generator::generate;
use crate::llm::CompletionClient;
use crate::selector::select;
use crate::sink::ResultSink;
use crate::types::{Result, RunInput, RunSummary};

/// One end-to-end aggregation run: fetch every source, rank the merged
/// candidates, let the model pick a handful, generate a post per pick and
/// persist each record as it is produced.
///
/// The two LLM stages are strictly sequential; only the feed fetches fan out,
/// bounded by `concurrency`.
pub async fn run(
    input: &RunInput,
    fetcher: &FeedFetcher,
    client: &dyn CompletionClient,
    sink: &mut dyn ResultSink,
    concurrency: usize,
) -> Result<RunSummary> {
    info!(sources = input.sources.len(), "starting aggregation run");

    let lists = fetcher.fetch_all(&input.sources, concurrency).await;
    let fetched: usize = lists.iter().map(Vec::len).sum();
    let items = aggregate(lists, input.max_articles);
    info!(fetched, candidates = items.len(), "aggregated feed items");

    if items.is_empty() {
        info!("no candidates, skipping selection");
        return Ok(RunSummary::default());
    }

    let indices = select(client, &items).await?;
    generate(client, sink, &items, &indices, input.post_word_target).await
}
