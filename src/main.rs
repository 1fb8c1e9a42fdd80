use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use feed_digester::fetcher::{FeedFetcher, DEFAULT_CONCURRENCY};
use feed_digester::llm::OpenAiClient;
use feed_digester::pipeline;
use feed_digester::sink::JsonlSink;
use feed_digester::types::{PipelineError, RunInput};

#[derive(Parser)]
#[command(name = "feed-digester")]
#[command(about = "Aggregate RSS/Atom feeds and generate posts for the most relevant items")]
struct Args {
    /// Path to the run configuration (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Where generated records are appended (JSON lines)
    #[arg(short, long, default_value = "records.jsonl")]
    output: PathBuf,

    /// Maximum number of concurrent feed fetches
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading run input {}", args.input.display()))?;
    let input: RunInput = serde_json::from_str(&raw).context("parsing run input")?;

    // Fail fast: without a credential neither selection nor generation can
    // happen, so the run ends before any feed is fetched.
    let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| PipelineError::MissingApiKey)?;

    let client = OpenAiClient::new(api_key, input.openai_model.clone())?;
    let fetcher = FeedFetcher::new()?;
    let mut sink = JsonlSink::create(&args.output)?;

    let summary = pipeline::run(&input, &fetcher, &client, &mut sink, args.concurrency).await?;
    info!(
        produced = summary.produced,
        skipped = summary.skipped,
        failed = summary.failed,
        "run finished"
    );
    Ok(())
}
