use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One normalized entry from an RSS or Atom document.
///
/// `published_at` keeps the source-native date string untouched; downstream
/// ordering compares these lexically, not chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub published_at: Option<String>,
    pub source: String,
}

/// Final persisted unit: a feed item plus the text generated for it.
/// Never mutated after construction; ownership moves to the sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedRecord {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub published_at: Option<String>,
    pub source: String,
    pub generated_text: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedRecord {
    pub fn new(item: &FeedItem, generated_text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: item.title.clone(),
            link: item.link.clone(),
            published_at: item.published_at.clone(),
            source: item.source.clone(),
            generated_text,
            created_at: Utc::now(),
        }
    }
}

/// Run configuration, consumed as an opaque record. Any subset of fields may
/// be present in the input document; the rest fall back to defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunInput {
    pub sources: Vec<String>,
    pub max_articles: usize,
    pub openai_model: String,
    #[serde(rename = "includeCTA")]
    pub include_cta: bool,
    #[serde(rename = "brandCTA")]
    pub brand_cta: String,
    pub post_word_target: usize,
}

impl Default for RunInput {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            max_articles: 60,
            openai_model: "gpt-4o-mini".to_string(),
            include_cta: true,
            brand_cta: "Dacă vrei sprijin, programează o sesiune pe psiconcept.ro.".to_string(),
            post_word_target: 150,
        }
    }
}

/// Per-run outcome counts for the generation stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub produced: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("completion request failed with status {status}: {body}")]
    Completion { status: u16, body: String },

    #[error("completion response contained no choices")]
    EmptyCompletion,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
