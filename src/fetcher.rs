use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::parser::FeedDocument;
use crate::types::{FeedItem, Result};

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Fetches and normalizes one feed source at a time, with a bounded fan-out
/// helper for whole source lists. Cheap to clone; all clones share one
/// connection pool.
#[derive(Clone)]
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent("feed-digester/0.1")
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch and normalize a single source. Never fails: any transport,
    /// status or parse problem degrades to an empty list so one bad feed
    /// cannot take down the whole run.
    pub async fn fetch(&self, url: &str) -> Vec<FeedItem> {
        match self.try_fetch(url).await {
            Ok(items) => {
                debug!(url, count = items.len(), "fetched feed");
                items
            }
            Err(e) => {
                warn!(url, error = %e, "feed fetch failed, skipping source");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<FeedItem>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let document = FeedDocument::parse(&body)?;
        Ok(document.into_items(url))
    }

    /// Fetch every source with at most `limit` requests in flight.
    ///
    /// Results come back in input order regardless of completion order: each
    /// task writes into its own reserved slot, which keeps the aggregator's
    /// tiebreak stable.
    pub async fn fetch_all(&self, urls: &[String], limit: usize) -> Vec<Vec<FeedItem>> {
        let semaphore = Arc::new(Semaphore::new(limit.max(1)));
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().enumerate() {
            let fetcher = self.clone();
            let url = url.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                // The semaphore is never closed, so acquire cannot fail.
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                (index, fetcher.fetch(&url).await)
            });
        }

        let mut slots: Vec<Vec<FeedItem>> = vec![Vec::new(); urls.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, items)) => slots[index] = items,
                Err(e) => warn!(error = %e, "fetch task panicked"),
            }
        }
        slots
    }
}
