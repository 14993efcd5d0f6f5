//! Flat `(component, label)` pair matching with raw confusion counts.

use super::{ratio, MetricRecord};
use crate::core::{ComponentId, Partition};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPairReport {
    pub metrics: MetricRecord,
    /// True positives over the number of ground-truth pairs
    pub accuracy: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LabelPairScorer;

impl LabelPairScorer {
    pub fn score(&self, ground_truth: &Partition, predicted: &Partition) -> LabelPairReport {
        let truth = flatten(ground_truth);
        let guess = flatten(predicted);

        let tp = guess.intersection(&truth).count();
        let fp = guess.len() - tp;
        let fn_ = truth.len() - tp;

        LabelPairReport {
            metrics: MetricRecord::new(ratio(tp, tp + fp), ratio(tp, tp + fn_)),
            accuracy: ratio(tp, truth.len()),
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
        }
    }
}

fn flatten(partition: &Partition) -> HashSet<(&ComponentId, &str)> {
    partition
        .iter()
        .flat_map(|c| c.members.iter().map(move |m| (m, c.label.as_str())))
        .collect()
}
