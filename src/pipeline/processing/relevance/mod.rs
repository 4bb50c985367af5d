//! Keyword relevance classification for raw NOTAM text.
//!
//! Decides whether a notice can plausibly affect runway takeoff or landing
//! performance. The decision is a fixed precedence chain (see [`rules::RULES`]):
//! empty text, taxiway-only, navigation-only, inclusion keyword, default.

pub mod rules;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::types::NotamRecord;
use rules::{NoticeText, RULES};

/// Why a notice was kept or excluded. Exactly one per classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceReason {
    EmptyText,
    TaxiwayOnly,
    NavigationOnly,
    HasRelevantKeyword,
    NoRelevantKeywords,
}

impl RelevanceReason {
    pub const ALL: [RelevanceReason; 5] = [
        RelevanceReason::EmptyText,
        RelevanceReason::TaxiwayOnly,
        RelevanceReason::NavigationOnly,
        RelevanceReason::HasRelevantKeyword,
        RelevanceReason::NoRelevantKeywords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelevanceReason::EmptyText => "empty_text",
            RelevanceReason::TaxiwayOnly => "taxiway_only",
            RelevanceReason::NavigationOnly => "navigation_only",
            RelevanceReason::HasRelevantKeyword => "has_relevant_keyword",
            RelevanceReason::NoRelevantKeywords => "no_relevant_keywords",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|reason| reason.as_str() == name)
    }
}

impl fmt::Display for RelevanceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_relevant: bool,
    pub reason: RelevanceReason,
}

/// Trait for deciding runway-performance relevance of NOTAM text
pub trait RelevanceClassifier {
    fn classify(&self, text: &str) -> ClassificationResult;
}

/// The keyword precedence chain used for the silver dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl RelevanceClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> ClassificationResult {
        classify(text)
    }
}

/// Classify one NOTAM text. Total: every input maps to exactly one reason.
pub fn classify(text: &str) -> ClassificationResult {
    let notice = NoticeText::new(text);
    RULES
        .iter()
        .find(|rule| (rule.applies)(&notice))
        .map(|rule| ClassificationResult {
            is_relevant: rule.relevant,
            reason: rule.reason,
        })
        .unwrap_or(ClassificationResult {
            is_relevant: false,
            reason: RelevanceReason::NoRelevantKeywords,
        })
}

/// The outcome of classifying a batch of records
#[derive(Debug, Clone, Default)]
pub struct ClassifiedBatch {
    /// Candidates for extraction, in input order
    pub relevant: Vec<NotamRecord>,
    /// Rejected records tagged with their exclusion reason, in input order
    pub excluded: Vec<NotamRecord>,
    /// How many records were excluded for each reason
    pub reason_counts: BTreeMap<RelevanceReason, usize>,
}

impl ClassifiedBatch {
    pub fn total(&self) -> usize {
        self.relevant.len() + self.excluded.len()
    }

    /// Exclusion reasons ordered by descending count (ties by reason order)
    pub fn reasons_by_count(&self) -> Vec<(RelevanceReason, usize)> {
        let mut counts: Vec<_> = self.reason_counts.iter().map(|(r, c)| (*r, *c)).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts
    }
}

/// Split records into relevant and excluded sets using `classifier`.
pub fn classify_all_with<C>(classifier: &C, records: Vec<NotamRecord>) -> ClassifiedBatch
where
    C: RelevanceClassifier + ?Sized,
{
    let mut batch = ClassifiedBatch::default();

    for mut record in records {
        let result = classifier.classify(record.text());
        if result.is_relevant {
            batch.relevant.push(record);
        } else {
            record.set_exclusion_reason(result.reason);
            *batch.reason_counts.entry(result.reason).or_insert(0) += 1;
            batch.excluded.push(record);
        }
    }

    batch
}

pub fn classify_all(records: Vec<NotamRecord>) -> ClassifiedBatch {
    classify_all_with(&KeywordClassifier, records)
}

const CANCELLATION_MARKERS: &[&str] = &["CANCEL", "NOTAMC", "CNL", "CNCL", "WITHDRAWN"];

/// Whether the text announces a cancellation (NOTAMC, CNL, ...).
pub fn is_cancellation(text: &str) -> bool {
    let upper = text.to_uppercase();
    CANCELLATION_MARKERS.iter().any(|marker| upper.contains(marker))
}
