use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::app::ports::{FilterOutputPort, NotamSourcePort};
use crate::error::CuratorError;
use crate::types::NotamRecord;

/// Reads the downloaded NOTAMs from a pretty-printed JSON array
pub struct NotamFileSource {
    pub path: PathBuf,
}

impl NotamFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl NotamSourcePort for NotamFileSource {
    async fn load_notams(&self) -> anyhow::Result<Vec<NotamRecord>> {
        if !self.path.exists() {
            return Err(CuratorError::MissingInput(self.path.clone()).into());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let records: Vec<NotamRecord> = serde_json::from_str(&contents)
            .map_err(CuratorError::from)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        debug!(path = %self.path.display(), count = records.len(), "Read NOTAM file");
        Ok(records)
    }
}

/// Writes relevant and excluded NOTAMs to two JSON array files
pub struct FilterFileOutput {
    pub relevant_path: PathBuf,
    pub excluded_path: PathBuf,
}

impl FilterFileOutput {
    pub fn new(relevant_path: impl Into<PathBuf>, excluded_path: impl Into<PathBuf>) -> Self {
        Self {
            relevant_path: relevant_path.into(),
            excluded_path: excluded_path.into(),
        }
    }
}

#[async_trait]
impl FilterOutputPort for FilterFileOutput {
    async fn write_relevant(&self, records: &[NotamRecord]) -> anyhow::Result<()> {
        write_json_array(&self.relevant_path, records).await
    }

    async fn write_excluded(&self, records: &[NotamRecord]) -> anyhow::Result<()> {
        write_json_array(&self.excluded_path, records).await
    }
}

/// Ensure the parent directory of `path` exists
pub(crate) async fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
            debug!(dir = %parent.display(), "Created output directory");
        }
    }
    Ok(())
}

async fn write_json_array(path: &Path, records: &[NotamRecord]) -> anyhow::Result<()> {
    ensure_parent_dir(path).await?;

    let json = serde_json::to_string_pretty(records).map_err(CuratorError::from)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!(path = %path.display(), count = records.len(), "Wrote NOTAM file");
    Ok(())
}
