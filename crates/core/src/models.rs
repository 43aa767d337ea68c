use crate::rules::AppliedRule;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Final state of one processed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Content changed and was written back
    Updated,
    /// Content would change, but the run was a dry run
    WouldUpdate,
    /// No rule matched
    Unchanged,
    /// Reading or writing failed
    Failed,
}

/// Outcome of rewriting a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Unchanged,
    Rewritten {
        /// Total matches across all rules
        replacements: usize,
        /// Per-rule breakdown, in rule order
        rules: Vec<AppliedRule>,
    },
}

/// Report line for a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Path as traversed (root-joined)
    pub path: PathBuf,
    pub status: FileStatus,
    #[serde(default)]
    pub replacements: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<AppliedRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn is_changed(&self) -> bool {
        matches!(self.status, FileStatus::Updated | FileStatus::WouldUpdate)
    }
}

/// Aggregate counters for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub files_scanned: usize,
    pub files_updated: usize,
    pub files_unchanged: usize,
    pub files_failed: usize,
    pub total_replacements: usize,
}

impl RunStats {
    pub fn record(&mut self, report: &FileReport) {
        self.files_scanned += 1;
        match report.status {
            FileStatus::Updated | FileStatus::WouldUpdate => self.files_updated += 1,
            FileStatus::Unchanged => self.files_unchanged += 1,
            FileStatus::Failed => self.files_failed += 1,
        }
        self.total_replacements += report.replacements;
    }
}

/// Run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub duration_ms: u64,
    pub timestamp: String,
    pub tool_version: String,
    pub dry_run: bool,
}

impl Default for RunMetadata {
    fn default() -> Self {
        Self {
            duration_ms: 0,
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            dry_run: false,
        }
    }
}

/// Summary of a full run over the source tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Root directory that was walked
    pub root: PathBuf,
    /// Every eligible file, in walk order
    pub files: Vec<FileReport>,
    pub stats: RunStats,
    pub metadata: RunMetadata,
}

impl RunReport {
    /// Files whose content changed (or would change)
    pub fn changed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.is_changed())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Failed)
    }

    pub fn has_failures(&self) -> bool {
        self.stats.files_failed > 0
    }
}
