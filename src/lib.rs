pub mod aggregator;
pub mod fetcher;
pub mod generator;
pub mod llm;
pub mod parser;
pub mod pipeline;
pub mod selector;
pub mod sink;
pub mod types;

pub use aggregator::aggregate;
pub use fetcher::FeedFetcher;
pub use llm::{CompletionClient, MockCompletionClient, OpenAiClient};
pub use parser::FeedDocument;
pub use sink::{JsonlSink, MemorySink, ResultSink};
pub use types::*;
