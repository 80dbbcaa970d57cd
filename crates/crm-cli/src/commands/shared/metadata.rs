use std::path::Path;

use anyhow::Context;
use crm_schema::PlanMetadata;

/// Read a plan metadata JSON file. An empty file is an empty plan.
pub fn read_metadata(path: &Path) -> anyhow::Result<PlanMetadata> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read metadata {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(PlanMetadata::new());
    }
    PlanMetadata::from_json_str(&text)
        .with_context(|| format!("invalid metadata in {}", path.display()))
}

/// Write plan metadata as pretty JSON.
pub fn write_metadata(path: &Path, metadata: &PlanMetadata) -> anyhow::Result<()> {
    let mut text = serde_json::to_string_pretty(metadata)?;
    text.push('\n');
    std::fs::write(path, text).with_context(|| format!("failed to write metadata {}", path.display()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{read_metadata, write_metadata};

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plan.json");
        std::fs::write(&path, r#"{"carrier_name":"Acme","gym":"yes"}"#).expect("write");

        let metadata = read_metadata(&path).expect("read");
        assert_eq!(metadata.len(), 2);

        let out = dir.path().join("out.json");
        write_metadata(&out, &metadata).expect("write");
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).expect("read back")).expect("json");
        assert_eq!(value, json!({ "carrier_name": "Acme", "gym": "yes" }));
    }

    #[test]
    fn empty_file_is_empty_plan() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plan.json");
        std::fs::write(&path, "\n").expect("write");
        assert!(read_metadata(&path).expect("read").is_empty());
    }

    #[test]
    fn array_metadata_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plan.json");
        std::fs::write(&path, "[1, 2]").expect("write");
        let err = read_metadata(&path).expect_err("should fail");
        assert!(format!("{err:#}").contains("invalid metadata"));
    }
}
