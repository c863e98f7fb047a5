use crate::domain::model::ExamResult;
use crate::domain::ports::{ResultSink, Storage};
use crate::utils::error::{ExamError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const HISTORY_FILE: &str = "history.jsonl";

/// One line of the history file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub exam_name: String,
    pub score: usize,
    pub max_score: usize,
    pub percentage: f64,
    pub passed: bool,
    #[serde(default)]
    pub timed_out: bool,
}

impl From<&ExamResult> for HistoryEntry {
    fn from(result: &ExamResult) -> Self {
        Self {
            timestamp: result.timestamp.clone(),
            exam_name: result.exam_name.clone(),
            score: result.score,
            max_score: result.max_score,
            percentage: result.percentage,
            passed: result.passed,
            timed_out: result.timed_out,
        }
    }
}

pub struct HistorySink<S: Storage> {
    storage: S,
}

impl<S: Storage> HistorySink<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[async_trait]
impl<S: Storage> ResultSink for HistorySink<S> {
    async fn record(&self, result: &ExamResult) -> Result<()> {
        let mut line = serde_json::to_vec(&HistoryEntry::from(result))?;
        line.push(b'\n');
        self.storage.append_file(HISTORY_FILE, &line).await?;
        tracing::debug!("Appended result for '{}' to {}", result.exam_name, HISTORY_FILE);
        Ok(())
    }
}

/// Sink used when history is turned off.
pub struct NoHistory;

#[async_trait]
impl ResultSink for NoHistory {
    async fn record(&self, _result: &ExamResult) -> Result<()> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

pub fn parse_history(content: &str, exam: Option<&str>) -> Vec<HistoryEntry> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(i, line)| match serde_json::from_str::<HistoryEntry>(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("⚠️ Skipping malformed history line {}: {}", i + 1, e);
                None
            }
        })
        .filter(|entry| exam.map_or(true, |name| entry.exam_name == name))
        .collect()
}

/// An absent history file reads as empty.
pub async fn read_history<S: Storage>(storage: &S, exam: Option<&str>) -> Result<Vec<HistoryEntry>> {
    if !storage.root_exists().await {
        return Ok(Vec::new());
    }
    let data = match storage.read_file(HISTORY_FILE).await {
        Ok(data) => data,
        Err(ExamError::IoError(e))
            if e.kind() == std::io::ErrorKind::NotFound =>
        {
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };
    Ok(parse_history(&String::from_utf8_lossy(&data), exam))
}

pub fn export_csv<W: std::io::Write>(entries: &[HistoryEntry], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in entries {
        csv_writer.serialize(entry)?;
    }
    csv_writer.flush()?;
    Ok(())
}
