pub mod assignment;
pub mod count;
pub mod existence;
pub mod label_pairs;
pub mod overlap;
pub mod pairwise;
pub mod strategy;

pub use assignment::{maximize_overlap, solve_assignment};
pub use count::{evaluate_count, CountObservation};
pub use existence::ExistenceScorer;
pub use label_pairs::{LabelPairReport, LabelPairScorer};
pub use overlap::{overlap_matrix, ClusterMatch, OverlapAssignmentScorer, OverlapReport};
pub use pairwise::{PairwiseConsistencyScorer, ScoringMode, DEFAULT_FLAT_LABELS};
pub use strategy::{Evaluator, Strategy};

use serde::{Deserialize, Serialize};

/// Precision / recall / F1 for one evaluation instance.
///
/// `ace` is only set by the count evaluator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(rename = "Precision")]
    pub precision: f64,
    #[serde(rename = "Recall")]
    pub recall: f64,
    #[serde(rename = "F1-score")]
    pub f1: f64,
    #[serde(rename = "ACE", default, skip_serializing_if = "Option::is_none")]
    pub ace: Option<u64>,
}

impl MetricRecord {
    /// Build from precision and recall; F1 is their harmonic mean.
    pub fn new(precision: f64, recall: f64) -> Self {
        Self {
            precision,
            recall,
            f1: f1_score(precision, recall),
            ace: None,
        }
    }

    /// Build from macro-averaged values where F1 was averaged separately.
    pub fn with_f1(precision: f64, recall: f64, f1: f64) -> Self {
        Self {
            precision,
            recall,
            f1,
            ace: None,
        }
    }

    /// `correct / predicted_total` and `correct / truth_total`, zero-guarded
    pub fn from_counts(correct: usize, predicted_total: usize, truth_total: usize) -> Self {
        Self::new(ratio(correct, predicted_total), ratio(correct, truth_total))
    }

    pub fn with_ace(mut self, ace: u64) -> Self {
        self.ace = Some(ace);
        self
    }

    pub fn is_zero(&self) -> bool {
        self.precision == 0.0 && self.recall == 0.0 && self.f1 == 0.0
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0
pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Harmonic mean of precision and recall, 0 when both are 0
pub fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Unweighted mean, 0 for an empty slice
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
