//! Append-only record log
//!
//! Every completed intake becomes one CSV row. Rows are grouped into one file
//! per calendar day (`intake-YYYY-MM-DD.csv`); the header row is written when
//! a day's file is created.

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;
use crate::models::{IntakeRecord, LOG_HEADER};
use crate::utils::errors::{IntakeError, Result};
use crate::utils::helpers::csv_line;

/// Sink for structured rows
#[async_trait]
pub trait RecordLog: Send + Sync {
    async fn append_record(&self, record: &IntakeRecord) -> Result<()>;
}

/// CSV files in a directory, one per day
#[derive(Debug)]
pub struct CsvRecordLog {
    dir: PathBuf,
    /// Appends from different conversations must not interleave
    write_lock: Mutex<()>,
}

impl CsvRecordLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// File holding the rows of `date`
    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("intake-{}.csv", date.format("%Y-%m-%d")))
    }

}

/// Name the file an I/O failure happened on
fn sink_error(path: &Path, e: std::io::Error) -> IntakeError {
    IntakeError::Sink(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl RecordLog for CsvRecordLog {
    async fn append_record(&self, record: &IntakeRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        fs::create_dir_all(&self.dir).await.map_err(|e| sink_error(&self.dir, e))?;
        let path = self.file_for(record.calendar_date());

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| sink_error(&path, e))?;

        let metadata = file.metadata().await.map_err(|e| sink_error(&path, e))?;
        let mut content = String::new();
        if metadata.len() == 0 {
            content.push_str(&csv_line(&LOG_HEADER));
        }
        content.push_str(&csv_line(&record.log_row()));

        file.write_all(content.as_bytes()).await.map_err(|e| sink_error(&path, e))?;
        file.flush().await.map_err(|e| sink_error(&path, e))?;

        debug!(path = %path.display(), conversation_id = record.conversation_id.0, "Record appended");
        Ok(())
    }
}
