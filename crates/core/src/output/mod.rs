mod json;
mod yaml;

pub use json::to_json;
pub use yaml::to_yaml;

use crate::models::{FileReport, FileStatus, RunReport};

/// Output format options for the run report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Format a RunReport according to the specified format
pub fn format_report(report: &RunReport, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Text => Ok(format_summary(report)),
        OutputFormat::Json => to_json(report),
        OutputFormat::Yaml => to_yaml(report),
    }
}

/// The per-file notice printed while a run is in progress.
///
/// Unchanged files produce no line.
pub fn notice_line(file: &FileReport) -> Option<String> {
    match file.status {
        FileStatus::Updated => Some(format!("Updated: {}", file.path.display())),
        FileStatus::WouldUpdate => Some(format!("Would update: {}", file.path.display())),
        FileStatus::Failed => Some(format!(
            "Error processing {}: {}",
            file.path.display(),
            file.error.as_deref().unwrap_or("unknown error")
        )),
        FileStatus::Unchanged => None,
    }
}

/// Generate a human-readable summary
pub fn format_summary(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Import Rewrite Summary{}\n\
         ======================\n\
         Root: {}\n\n",
        if report.metadata.dry_run { " (dry run)" } else { "" },
        report.root.display()
    ));

    output.push_str(&format!(
        "Files Scanned: {}\n\
         - {}: {}\n\
         - Unchanged: {}\n\
         - Failed: {}\n\
         Replacements: {}\n\n",
        report.stats.files_scanned,
        if report.metadata.dry_run { "Would update" } else { "Updated" },
        report.stats.files_updated,
        report.stats.files_unchanged,
        report.stats.files_failed,
        report.stats.total_replacements
    ));

    if report.has_failures() {
        output.push_str("Failures:\n");
        for file in report.failures() {
            output.push_str(&format!(
                "  {}: {}\n",
                file.path.display(),
                file.error.as_deref().unwrap_or("unknown error")
            ));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Duration: {}ms\n\
         Timestamp: {}\n\
         Tool Version: {}\n",
        report.metadata.duration_ms, report.metadata.timestamp, report.metadata.tool_version
    ));

    output
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}
