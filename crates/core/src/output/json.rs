use crate::models::RunReport;
use super::FormatError;

/// Serialize a RunReport to pretty-printed JSON
pub fn to_json(report: &RunReport) -> Result<String, FormatError> {
    serde_json::to_string_pretty(report).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileReport, FileStatus, RunMetadata, RunStats};
    use std::path::PathBuf;

    #[test]
    fn test_to_json() {
        let report = RunReport {
            root: PathBuf::from("lib"),
            files: vec![FileReport {
                path: PathBuf::from("lib/a.dart"),
                status: FileStatus::WouldUpdate,
                replacements: 1,
                rules: vec![],
                error: None,
            }],
            stats: RunStats::default(),
            metadata: RunMetadata::default(),
        };

        let json = to_json(&report).unwrap();
        assert!(json.contains("\"root\": \"lib\""));
        assert!(json.contains("\"would_update\""));
        assert!(!json.contains("\"error\""));
    }
}
