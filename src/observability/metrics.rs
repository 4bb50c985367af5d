//! Metrics for the curation passes.
//!
//! Names follow Prometheus conventions. Recording goes through the `metrics`
//! facade, so nothing is exported unless the embedding process installs a
//! recorder.

use std::fmt;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Relevance filter metrics
    RelevanceRecordsClassified,
    RelevanceRecordsRelevant,
    RelevanceRecordsExcluded,
    RelevanceBatchSize,

    // Sanitizer metrics
    SanitizeEntriesProcessed,
    SanitizeFixesApplied,

    // Dataset I/O metrics
    DatasetLinesSkipped,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RelevanceRecordsClassified => "notam_relevance_records_classified_total",
            MetricName::RelevanceRecordsRelevant => "notam_relevance_records_relevant_total",
            MetricName::RelevanceRecordsExcluded => "notam_relevance_records_excluded_total",
            MetricName::RelevanceBatchSize => "notam_relevance_batch_size",
            MetricName::SanitizeEntriesProcessed => "notam_sanitize_entries_processed_total",
            MetricName::SanitizeFixesApplied => "notam_sanitize_fixes_applied_total",
            MetricName::DatasetLinesSkipped => "notam_dataset_lines_skipped_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod relevance {
    use super::MetricName;
    use crate::pipeline::processing::relevance::ClassifiedBatch;

    /// Record the outcome of a classification batch
    pub fn batch_classified(batch: &ClassifiedBatch) {
        let total = batch.total();
        ::metrics::counter!(MetricName::RelevanceRecordsClassified.as_str()).increment(total as u64);
        ::metrics::counter!(MetricName::RelevanceRecordsRelevant.as_str()).increment(batch.relevant.len() as u64);
        ::metrics::histogram!(MetricName::RelevanceBatchSize.as_str()).record(total as f64);

        for (reason, count) in &batch.reason_counts {
            ::metrics::counter!(MetricName::RelevanceRecordsExcluded.as_str(), "reason" => reason.as_str())
                .increment(*count as u64);
        }
    }
}

pub mod sanitize {
    use super::MetricName;
    use crate::pipeline::processing::normalize::SanitizeStats;

    /// Record which fixes a sanitizing pass applied
    pub fn fixes_applied(stats: &SanitizeStats) {
        ::metrics::counter!(MetricName::SanitizeEntriesProcessed.as_str()).increment(stats.entries as u64);

        let fixes = [
            ("runway_cleared", stats.runways_cleared),
            ("coordinates_converted", stats.coordinates_converted),
            ("bearing_converted", stats.bearings_converted),
            ("bearing_dropped", stats.bearings_dropped),
        ];
        for (kind, count) in fixes {
            ::metrics::counter!(MetricName::SanitizeFixesApplied.as_str(), "kind" => kind).increment(count as u64);
        }
    }
}

pub mod dataset {
    use super::MetricName;

    /// Record lines dropped because they failed to decode
    pub fn lines_skipped(count: usize) {
        ::metrics::counter!(MetricName::DatasetLinesSkipped.as_str()).increment(count as u64);
    }
}
