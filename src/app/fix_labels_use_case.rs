use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::app::ports::SilverDatasetPort;
use crate::pipeline::processing::normalize::{sanitize_records, LabelAudit, SanitizeStats};
use crate::types::SilverRecord;

/// Use case for rewriting labeling artifacts in the silver dataset
pub struct FixLabelsUseCase {
    dataset: Box<dyn SilverDatasetPort>,
    backup: bool,
    low_confidence_threshold: f64,
}

/// Summary of a fix-labels run
#[derive(Debug, Clone, Serialize)]
pub struct FixLabelsSummary {
    pub before: LabelAudit,
    /// `None` when the dataset had nothing to fix and was left untouched
    pub after: Option<LabelAudit>,
    pub fixes: SanitizeStats,
    pub low_confidence_records: usize,
    pub backup_path: Option<PathBuf>,
}

impl FixLabelsSummary {
    pub fn rewritten(&self) -> bool {
        self.after.is_some()
    }
}

/// Records whose weakest runway entry falls below `threshold`
pub fn count_low_confidence(records: &[SilverRecord], threshold: f64) -> usize {
    records.iter().filter(|r| r.min_confidence() < threshold).count()
}

impl FixLabelsUseCase {
    pub fn new(dataset: Box<dyn SilverDatasetPort>, backup: bool, low_confidence_threshold: f64) -> Self {
        Self {
            dataset,
            backup,
            low_confidence_threshold,
        }
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<FixLabelsSummary> {
        let mut records = self.dataset.load().await.context("Failed to load silver dataset")?;

        let before = LabelAudit::scan(&records);
        let low_confidence_records = count_low_confidence(&records, self.low_confidence_threshold);
        info!(
            records = before.records,
            entries = before.entries,
            all_runways = before.all_runways,
            coordinates_to_convert = before.coordinates_to_convert,
            bearings_to_convert = before.bearings_to_convert,
            odd_bearings = before.odd_bearings,
            low_confidence_records,
            "Audited silver dataset"
        );

        if !before.has_issues() {
            info!("No labeling issues found; dataset left unchanged");
            return Ok(FixLabelsSummary {
                before,
                after: None,
                fixes: SanitizeStats::default(),
                low_confidence_records,
                backup_path: None,
            });
        }

        let backup_path = if self.backup {
            let path = self.dataset.backup().await.context("Failed to back up silver dataset")?;
            info!(path = %path.display(), "Backed up silver dataset");
            Some(path)
        } else {
            None
        };

        let stats = sanitize_records(&mut records);
        crate::observability::metrics::sanitize::fixes_applied(&stats);

        self.dataset.save(&records).await.context("Failed to save silver dataset")?;

        let after = LabelAudit::scan(&records);
        info!(
            fixes = stats.changes(),
            coordinates_in_decimal = after.coordinates_in_decimal,
            numeric_bearings = after.numeric_bearings,
            "Silver dataset rewritten"
        );

        Ok(FixLabelsSummary {
            before,
            after: Some(after),
            fixes: stats,
            low_confidence_records,
            backup_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NotamRecord, RunwayEntry, CONFIDENCE, OBSTACLE_BEARING, OBSTACLE_COORDINATES, RUNWAY};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MemoryDataset {
        records: Arc<Mutex<Vec<SilverRecord>>>,
        backups: Arc<Mutex<Vec<Vec<SilverRecord>>>>,
        saves: Arc<Mutex<usize>>,
    }

    impl MemoryDataset {
        fn new(records: Vec<SilverRecord>) -> Self {
            Self {
                records: Arc::new(Mutex::new(records)),
                backups: Arc::new(Mutex::new(Vec::new())),
                saves: Arc::new(Mutex::new(0)),
            }
        }
    }

    #[async_trait]
    impl SilverDatasetPort for MemoryDataset {
        async fn load(&self) -> anyhow::Result<Vec<SilverRecord>> {
            Ok(self.records.lock().await.clone())
        }

        async fn backup(&self) -> anyhow::Result<PathBuf> {
            let stored = self.records.lock().await.clone();
            self.backups.lock().await.push(stored);
            Ok(PathBuf::from("memory.bak"))
        }

        async fn save(&self, records: &[SilverRecord]) -> anyhow::Result<()> {
            *self.records.lock().await = records.to_vec();
            *self.saves.lock().await += 1;
            Ok(())
        }
    }

    fn record_with(entry: RunwayEntry) -> SilverRecord {
        SilverRecord::new(NotamRecord::new("A1/24", "PAFA", "OBST CRANE"), vec![entry])
    }

    #[tokio::test]
    async fn test_run_rewrites_and_backs_up() {
        let entry = RunwayEntry::for_runway("ALL")
            .with(OBSTACLE_COORDINATES, "6449N14751W")
            .with(OBSTACLE_BEARING, "SE")
            .with(CONFIDENCE, 0.5);
        let dataset = MemoryDataset::new(vec![record_with(entry)]);

        let summary = FixLabelsUseCase::new(Box::new(dataset.clone()), true, 0.8).run().await.unwrap();

        assert!(summary.rewritten());
        assert_eq!(summary.before.all_runways, 1);
        assert_eq!(summary.fixes.runways_cleared, 1);
        assert_eq!(summary.fixes.coordinates_converted, 1);
        assert_eq!(summary.fixes.bearings_converted, 1);
        assert_eq!(summary.low_confidence_records, 1);
        assert_eq!(summary.backup_path, Some(PathBuf::from("memory.bak")));

        let after = summary.after.unwrap();
        assert!(!after.has_issues());
        assert_eq!(after.coordinates_in_decimal, 1);
        assert_eq!(after.numeric_bearings, 1);

        let saved = dataset.records.lock().await;
        let entry = &saved[0].runway_entries()[0];
        assert_eq!(entry.get(RUNWAY), Some(&Value::Null));
        assert_eq!(entry.obstacle_coordinates(), Some(&json!("64.8167, -147.8500")));
        assert_eq!(entry.obstacle_bearing(), Some(&json!(135.0)));

        // The backup holds the dataset as it was before sanitizing
        let backups = dataset.backups.lock().await;
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0][0].runway_entries()[0].runway(), Some("ALL"));
    }

    #[tokio::test]
    async fn test_clean_dataset_is_not_rewritten() {
        let entry = RunwayEntry::for_runway("20R")
            .with(OBSTACLE_COORDINATES, "64.8167, -147.8500")
            .with(OBSTACLE_BEARING, 135);
        let dataset = MemoryDataset::new(vec![record_with(entry)]);

        let summary = FixLabelsUseCase::new(Box::new(dataset.clone()), true, 0.8).run().await.unwrap();

        assert!(!summary.rewritten());
        assert_eq!(summary.backup_path, None);
        assert_eq!(*dataset.saves.lock().await, 0);
        assert!(dataset.backups.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_boolean_bearing_triggers_rewrite() {
        let entry = RunwayEntry::for_runway("09").with(OBSTACLE_BEARING, true);
        let dataset = MemoryDataset::new(vec![record_with(entry)]);

        let summary = FixLabelsUseCase::new(Box::new(dataset.clone()), false, 0.8).run().await.unwrap();

        assert!(summary.rewritten());
        assert_eq!(summary.before.odd_bearings, 1);
        let saved = dataset.records.lock().await;
        assert_eq!(saved[0].runway_entries()[0].obstacle_bearing(), Some(&json!(1.0)));
    }

    #[tokio::test]
    async fn test_backup_can_be_disabled() {
        let dataset = MemoryDataset::new(vec![record_with(RunwayEntry::for_runway("ALL"))]);

        let summary = FixLabelsUseCase::new(Box::new(dataset.clone()), false, 0.8).run().await.unwrap();

        assert!(summary.rewritten());
        assert_eq!(summary.backup_path, None);
        assert!(dataset.backups.lock().await.is_empty());
        assert_eq!(*dataset.saves.lock().await, 1);
    }

    #[test]
    fn test_count_low_confidence() {
        let confident = RunwayEntry::default().with(CONFIDENCE, 0.95);
        let shaky = RunwayEntry::default().with(CONFIDENCE, 0.6);
        // Textual confidence is not a score and counts as fully confident
        let textual = RunwayEntry::default().with(CONFIDENCE, "0.1");
        let records = vec![
            record_with(confident),
            record_with(shaky),
            record_with(textual),
            SilverRecord::new(NotamRecord::new("B", "PAFA", "x"), Vec::new()),
        ];
        assert_eq!(count_low_confidence(&records, 0.8), 1);
        assert_eq!(count_low_confidence(&records, 0.99), 2);
    }
}
