use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument};

use crate::app::ports::{FilterOutputPort, NotamSourcePort};
use crate::constants::TOP_LOCATIONS;
use crate::pipeline::processing::relevance::{
    classify_all_with, is_cancellation, ClassifiedBatch, KeywordClassifier, RelevanceClassifier, RelevanceReason,
};
use crate::types::NotamRecord;

/// Use case for splitting downloaded NOTAMs into extraction candidates and exclusions
pub struct FilterUseCase {
    classifier: Box<dyn RelevanceClassifier + Send + Sync>,
    source: Box<dyn NotamSourcePort>,
    output: Box<dyn FilterOutputPort>,
}

/// Summary of a filter run
#[derive(Debug, Clone, Serialize)]
pub struct FilterSummary {
    pub total: usize,
    pub relevant: usize,
    pub excluded: usize,
    /// Relevant records whose text announces a cancellation
    pub canceled_relevant: usize,
    /// Exclusion reasons, most frequent first
    pub reasons: Vec<(RelevanceReason, usize)>,
    /// Busiest ICAO locations across all input records
    pub top_locations: Vec<(String, usize)>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl FilterSummary {
    fn from_batch(batch: &ClassifiedBatch, top_locations: Vec<(String, usize)>, started_at: DateTime<Utc>) -> Self {
        Self {
            total: batch.total(),
            relevant: batch.relevant.len(),
            excluded: batch.excluded.len(),
            canceled_relevant: batch.relevant.iter().filter(|r| is_cancellation(r.text())).count(),
            reasons: batch.reasons_by_count(),
            top_locations,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn relevant_pct(&self) -> f64 {
        percentage(self.relevant, self.total)
    }

    pub fn excluded_pct(&self) -> f64 {
        percentage(self.excluded, self.total)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

/// Record counts per ICAO location, busiest first (ties alphabetical)
pub fn top_locations(records: &[NotamRecord], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.location()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

impl FilterUseCase {
    pub fn new(
        classifier: Box<dyn RelevanceClassifier + Send + Sync>,
        source: Box<dyn NotamSourcePort>,
        output: Box<dyn FilterOutputPort>,
    ) -> Self {
        Self {
            classifier,
            source,
            output,
        }
    }

    /// Create a use case with the keyword classifier
    pub fn with_keyword_classifier(source: Box<dyn NotamSourcePort>, output: Box<dyn FilterOutputPort>) -> Self {
        Self::new(Box::new(KeywordClassifier), source, output)
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<FilterSummary> {
        let started_at = Utc::now();

        let notams = self.source.load_notams().await.context("Failed to load NOTAMs")?;
        info!(count = notams.len(), "Loaded NOTAMs");

        let locations = top_locations(&notams, TOP_LOCATIONS);
        let batch = classify_all_with(self.classifier.as_ref(), notams);
        crate::observability::metrics::relevance::batch_classified(&batch);

        self.output
            .write_relevant(&batch.relevant)
            .await
            .context("Failed to write relevant NOTAMs")?;
        self.output
            .write_excluded(&batch.excluded)
            .await
            .context("Failed to write excluded NOTAMs")?;

        let summary = FilterSummary::from_batch(&batch, locations, started_at);
        info!(
            total = summary.total,
            relevant = summary.relevant,
            excluded = summary.excluded,
            "Filtering complete"
        );
        Ok(summary)
    }
}
