//! Macro node-level and assignment-based cluster-level agreement.
//!
//! Node level treats each component as a multi-label sample and averages
//! per-component scores. Cluster level pairs ground-truth and predicted
//! clusters by maximum total member overlap, then credits the overlap of
//! pairs whose labels agree.

use super::assignment::maximize_overlap;
use super::{f1_score, mean, ratio, MetricRecord};
use crate::core::{ComponentId, Partition};
use crate::index::ClusterMembershipIndex;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// One assigned (ground truth, predicted) cluster pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterMatch {
    pub ground_truth: usize,
    pub predicted: usize,
    pub overlap: usize,
    pub label_agrees: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapReport {
    pub node: MetricRecord,
    pub cluster: MetricRecord,
    pub cluster_correct: usize,
    pub cluster_total_predicted: usize,
    pub cluster_total_actual: usize,
    pub matches: Vec<ClusterMatch>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapAssignmentScorer;

impl OverlapAssignmentScorer {
    pub fn score(&self, ground_truth: &Partition, predicted: &Partition) -> OverlapReport {
        let node = self.node_metrics(ground_truth, predicted);
        let (cluster, matches) = self.assign_clusters(ground_truth, predicted);

        OverlapReport {
            node,
            cluster_correct: matches
                .iter()
                .filter(|m| m.label_agrees)
                .map(|m| m.overlap)
                .sum(),
            cluster_total_predicted: total_members(predicted),
            cluster_total_actual: total_members(ground_truth),
            cluster,
            matches,
        }
    }

    /// Mean over components of per-component label-set precision/recall/F1
    pub fn node_metrics(&self, ground_truth: &Partition, predicted: &Partition) -> MetricRecord {
        let gt_idx = ClusterMembershipIndex::build(ground_truth);
        let pred_idx = ClusterMembershipIndex::build(predicted);

        let components: BTreeSet<&ComponentId> =
            gt_idx.components().chain(pred_idx.components()).collect();

        let mut precisions = Vec::with_capacity(components.len());
        let mut recalls = Vec::with_capacity(components.len());
        let mut f1s = Vec::with_capacity(components.len());

        for component in components {
            let truth = gt_idx.get(component).map(|r| r.labels()).unwrap_or_default();
            let guess = pred_idx.get(component).map(|r| r.labels()).unwrap_or_default();
            let hits = guess.intersection(&truth).count();

            let precision = ratio(hits, guess.len());
            let recall = ratio(hits, truth.len());
            precisions.push(precision);
            recalls.push(recall);
            f1s.push(f1_score(precision, recall));
        }

        MetricRecord::with_f1(mean(&precisions), mean(&recalls), mean(&f1s))
    }

    /// One-vs-rest binary metrics per label, macro-averaged over labels
    pub fn class_metrics(&self, ground_truth: &Partition, predicted: &Partition) -> MetricRecord {
        let gt_idx = ClusterMembershipIndex::build(ground_truth);
        let pred_idx = ClusterMembershipIndex::build(predicted);

        let components: BTreeSet<&ComponentId> =
            gt_idx.components().chain(pred_idx.components()).collect();
        let classes: BTreeSet<&str> = ground_truth
            .iter()
            .chain(predicted.iter())
            .map(|c| c.label.as_str())
            .collect();

        let mut precisions = Vec::with_capacity(classes.len());
        let mut recalls = Vec::with_capacity(classes.len());
        let mut f1s = Vec::with_capacity(classes.len());

        for class in classes {
            let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
            for component in &components {
                let actual = gt_idx.get(component).is_some_and(|r| r.has_label(class));
                let guessed = pred_idx.get(component).is_some_and(|r| r.has_label(class));
                match (actual, guessed) {
                    (true, true) => tp += 1,
                    (false, true) => fp += 1,
                    (true, false) => fn_ += 1,
                    (false, false) => {}
                }
            }

            let precision = ratio(tp, tp + fp);
            let recall = ratio(tp, tp + fn_);
            precisions.push(precision);
            recalls.push(recall);
            f1s.push(f1_score(precision, recall));
        }

        MetricRecord::with_f1(mean(&precisions), mean(&recalls), mean(&f1s))
    }

    pub fn cluster_metrics(&self, ground_truth: &Partition, predicted: &Partition) -> MetricRecord {
        self.assign_clusters(ground_truth, predicted).0
    }

    fn assign_clusters(
        &self,
        ground_truth: &Partition,
        predicted: &Partition,
    ) -> (MetricRecord, Vec<ClusterMatch>) {
        let overlap = overlap_matrix(ground_truth, predicted);

        let matches: Vec<ClusterMatch> = maximize_overlap(&overlap)
            .into_iter()
            .map(|(i, j)| ClusterMatch {
                ground_truth: i,
                predicted: j,
                overlap: overlap[i][j],
                label_agrees: ground_truth.clusters()[i].label == predicted.clusters()[j].label,
            })
            .collect();

        let correct: usize = matches
            .iter()
            .filter(|m| m.label_agrees)
            .map(|m| m.overlap)
            .sum();
        let total_predicted = total_members(predicted);
        let total_actual = total_members(ground_truth);

        debug!(
            pairs = matches.len(),
            correct, total_predicted, total_actual, "cluster assignment scored"
        );

        (
            MetricRecord::from_counts(correct, total_predicted, total_actual),
            matches,
        )
    }
}

/// `O[i][j] = |members(G_i) ∩ members(P_j)|`
pub fn overlap_matrix(ground_truth: &Partition, predicted: &Partition) -> Vec<Vec<usize>> {
    let predicted_sets: Vec<HashSet<&ComponentId>> =
        predicted.iter().map(|c| c.member_set()).collect();

    ground_truth
        .iter()
        .map(|g| {
            let g = g.member_set();
            predicted_sets
                .iter()
                .map(|p| g.intersection(p).count())
                .collect()
        })
        .collect()
}

/// Sum of distinct member counts over all clusters
fn total_members(partition: &Partition) -> usize {
    partition.iter().map(|c| c.member_set().len()).sum()
}
