use async_trait::async_trait;
use std::path::PathBuf;

use crate::types::{NotamRecord, SilverRecord};

/// Where freshly downloaded NOTAMs are read from
#[async_trait]
pub trait NotamSourcePort: Send + Sync {
    async fn load_notams(&self) -> anyhow::Result<Vec<NotamRecord>>;
}

/// Where the two halves of a relevance split are written
#[async_trait]
pub trait FilterOutputPort: Send + Sync {
    async fn write_relevant(&self, records: &[NotamRecord]) -> anyhow::Result<()>;
    async fn write_excluded(&self, records: &[NotamRecord]) -> anyhow::Result<()>;
}

/// The silver dataset, rewritten in place by the label fixer
#[async_trait]
pub trait SilverDatasetPort: Send + Sync {
    async fn load(&self) -> anyhow::Result<Vec<SilverRecord>>;
    /// Copy the stored dataset, as stored, beside it and return the copy's location.
    /// Lines `load` could not decode are kept in the copy.
    async fn backup(&self) -> anyhow::Result<PathBuf>;
    async fn save(&self, records: &[SilverRecord]) -> anyhow::Result<()>;
}
