//! Session report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::AnswerRecord;
use crate::statistics::{summarize, PerformanceSummary};

/// Everything known about one finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Where the questions came from, if loaded from a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub question_count: usize,
    /// The transcript, in answer order.
    pub answers: Vec<AnswerRecord>,
    pub summary: PerformanceSummary,
}

impl SessionReport {
    /// Build a report from a completed transcript.
    pub fn from_transcript(answers: Vec<AnswerRecord>, source: Option<String>) -> Self {
        let summary = summarize(&answers);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            source,
            question_count: answers.len(),
            answers,
            summary,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
