use anyhow::Context;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::app::ports::SilverDatasetPort;
use crate::constants::BACKUP_SUFFIX;
use crate::error::CuratorError;
use crate::infra::notam_file_adapter::ensure_parent_dir;
use crate::text::strip;
use crate::types::SilverRecord;

/// The silver dataset stored as JSON lines, one record per line
pub struct JsonLinesDataset {
    pub path: PathBuf,
}

impl JsonLinesDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dataset>.bak` beside the dataset
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".");
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }
}

/// Decode JSON lines, skipping blank lines and lines that are not JSON objects
pub fn parse_json_lines(contents: &str) -> (Vec<SilverRecord>, usize) {
    let mut records = Vec::new();
    let mut skipped = 0;

    for (index, line) in contents.lines().enumerate() {
        let line = strip(line);
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<SilverRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping undecodable dataset line");
                skipped += 1;
            }
        }
    }

    (records, skipped)
}

async fn write_json_lines(path: &Path, records: &[SilverRecord]) -> anyhow::Result<()> {
    ensure_parent_dir(path).await?;

    let mut buffer = String::new();
    for record in records {
        buffer.push_str(&serde_json::to_string(record).map_err(CuratorError::from)?);
        buffer.push('\n');
    }

    tokio::fs::write(path, buffer)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), count = records.len(), "Wrote dataset file");
    Ok(())
}

#[async_trait]
impl SilverDatasetPort for JsonLinesDataset {
    async fn load(&self) -> anyhow::Result<Vec<SilverRecord>> {
        if !self.path.exists() {
            return Err(CuratorError::MissingInput(self.path.clone()).into());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let (records, skipped) = parse_json_lines(&contents);
        if skipped > 0 {
            crate::observability::metrics::dataset::lines_skipped(skipped);
        }

        debug!(path = %self.path.display(), count = records.len(), skipped, "Read dataset file");
        Ok(records)
    }

    async fn backup(&self) -> anyhow::Result<PathBuf> {
        let path = self.backup_path();
        let bytes = tokio::fs::copy(&self.path, &path)
            .await
            .with_context(|| format!("Failed to copy {} to {}", self.path.display(), path.display()))?;
        debug!(path = %path.display(), bytes, "Wrote dataset backup");
        Ok(path)
    }

    async fn save(&self, records: &[SilverRecord]) -> anyhow::Result<()> {
        write_json_lines(&self.path, records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_blank_and_broken_lines() {
        let contents = concat!(
            "{\"notam_id\": \"A1\", \"runway_entries\": []}\n",
            "\n",
            "{not json\n",
            "[1, 2]\n",
            "{\"notam_id\": 42, \"runway_entries\": null}\n",
        );
        let (records, skipped) = parse_json_lines(contents);
        assert_eq!(skipped, 2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id(), "42");
        assert!(records[1].runway_entries().is_empty());
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        let dataset = JsonLinesDataset::new("data/silver_dataset.jsonl");
        assert_eq!(dataset.backup_path(), PathBuf::from("data/silver_dataset.jsonl.bak"));
    }

    #[tokio::test]
    async fn test_backup_is_a_byte_copy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("silver.jsonl");
        let contents = "{\"runway\": \"ALL\"}\n{not json\n\n{\"TORA\": 2500}\n";
        std::fs::write(&path, contents).unwrap();

        let dataset = JsonLinesDataset::new(&path);
        let backup = dataset.backup().await.unwrap();

        assert_eq!(backup, dir.path().join("silver.jsonl.bak"));
        assert_eq!(std::fs::read_to_string(backup).unwrap(), contents);
    }

    #[tokio::test]
    async fn test_save_writes_one_line_per_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/silver.jsonl");
        let line = r#"{"notam_id":"A1","runway_entries":[{"runway":9,"TORA":2500}],"model":null}"#;
        let (records, _) = parse_json_lines(line);

        let dataset = JsonLinesDataset::new(&path);
        dataset.save(&records).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), format!("{}\n", line));
    }
}
