use crate::models::RunReport;
use super::FormatError;

/// Serialize a RunReport to YAML
pub fn to_yaml(report: &RunReport) -> Result<String, FormatError> {
    serde_yaml::to_string(report).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RunMetadata, RunStats};
    use std::path::PathBuf;

    #[test]
    fn test_to_yaml() {
        let report = RunReport {
            root: PathBuf::from("lib"),
            files: vec![],
            stats: RunStats::default(),
            metadata: RunMetadata::default(),
        };

        let yaml = to_yaml(&report).unwrap();
        assert!(yaml.contains("root: lib"));
        assert!(yaml.contains("files_scanned: 0"));
    }
}
