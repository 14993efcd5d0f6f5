//! Label-agnostic set membership: a predicted component is correct when it
//! appears anywhere in ground truth.

use super::MetricRecord;
use crate::core::Partition;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExistenceScorer;

impl ExistenceScorer {
    pub fn score(&self, predicted: &Partition, ground_truth: &Partition) -> MetricRecord {
        let predicted = predicted.components();
        let truth = ground_truth.components();
        let correct = predicted.intersection(&truth).count();
        MetricRecord::from_counts(correct, predicted.len(), truth.len())
    }
}
