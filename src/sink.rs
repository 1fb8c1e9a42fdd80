use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::types::{GeneratedRecord, Result};

/// Append-only destination for generated records. Write order follows
/// generation order; there is no read-back, update or delete.
#[async_trait]
pub trait ResultSink: Send {
    async fn push(&mut self, record: &GeneratedRecord) -> Result<()>;
}

/// One JSON object per line, appended to a file.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

#[async_trait]
impl ResultSink for JsonlSink {
    async fn push(&mut self, record: &GeneratedRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.flush()?;
        debug!(link = %record.link, "appended record");
        Ok(())
    }
}

/// In-memory sink for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<GeneratedRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[GeneratedRecord] {
        &self.records
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn push(&mut self, record: &GeneratedRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
