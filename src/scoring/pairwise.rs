//! Pairwise-consistency precision/recall.
//!
//! A predicted component only counts as correct when
//! 1. the label of its first predicted cluster appears among its ground-truth
//!    labels, and
//! 2. every other component of each predicted cluster it sits in shares a
//!    ground-truth cluster with it carrying that predicted cluster's label.
//!
//! Ground truth that starts with a flat device class (diode-connected
//! transistors, load capacitors, ...) has no structure to check, so scoring
//! falls back to plain existence.

use super::MetricRecord;
use crate::core::{ClusterKey, ComponentId, Partition};
use crate::index::ClusterMembershipIndex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Flat, non-structural device classes
pub const DEFAULT_FLAT_LABELS: [&str; 3] = ["MosfetDiode", "load_cap", "compensation_cap"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Presence in ground truth is enough
    Existence,
    /// Label and pairwise co-membership are checked
    Structural,
}

#[derive(Debug, Clone)]
pub struct PairwiseConsistencyScorer {
    flat_labels: HashSet<String>,
}

impl Default for PairwiseConsistencyScorer {
    fn default() -> Self {
        Self::with_flat_labels(DEFAULT_FLAT_LABELS)
    }
}

impl PairwiseConsistencyScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flat_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flat_labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Mode is decided by the label of the first ground-truth cluster
    pub fn mode_for(&self, ground_truth: &Partition) -> ScoringMode {
        match ground_truth.first_label() {
            Some(label) if self.flat_labels.contains(label) => ScoringMode::Existence,
            _ => ScoringMode::Structural,
        }
    }

    pub fn score(&self, predicted: &Partition, ground_truth: &Partition) -> MetricRecord {
        self.score_with_mode(self.mode_for(ground_truth), predicted, ground_truth)
    }

    /// Score under a mode decided elsewhere, e.g. from ground truth before
    /// label merging reordered its clusters.
    pub fn score_with_mode(
        &self,
        mode: ScoringMode,
        predicted: &Partition,
        ground_truth: &Partition,
    ) -> MetricRecord {
        let pred_idx = ClusterMembershipIndex::build(predicted);
        let gt_idx = ClusterMembershipIndex::build(ground_truth);

        let correct = self
            .verdicts_with(mode, &pred_idx, &gt_idx)
            .values()
            .filter(|&&ok| ok)
            .count();

        debug!(
            ?mode,
            correct,
            predicted = pred_idx.len(),
            ground_truth = gt_idx.len(),
            "pairwise consistency scored"
        );

        MetricRecord::from_counts(correct, pred_idx.len(), gt_idx.len())
    }

    /// Per-component correctness for every predicted component
    pub fn verdicts(
        &self,
        predicted: &Partition,
        ground_truth: &Partition,
    ) -> BTreeMap<ComponentId, bool> {
        let pred_idx = ClusterMembershipIndex::build(predicted);
        let gt_idx = ClusterMembershipIndex::build(ground_truth);
        self.verdicts_with(self.mode_for(ground_truth), &pred_idx, &gt_idx)
            .into_iter()
            .map(|(id, ok)| (id.clone(), ok))
            .collect()
    }

    fn verdicts_with<'a>(
        &self,
        mode: ScoringMode,
        pred_idx: &'a ClusterMembershipIndex,
        gt_idx: &ClusterMembershipIndex,
    ) -> HashMap<&'a ComponentId, bool> {
        match mode {
            ScoringMode::Existence => pred_idx
                .components()
                .map(|c| (c, gt_idx.contains(c)))
                .collect(),
            ScoringMode::Structural => structural_verdicts(pred_idx, gt_idx),
        }
    }
}

fn structural_verdicts<'a>(
    pred_idx: &'a ClusterMembershipIndex,
    gt_idx: &ClusterMembershipIndex,
) -> HashMap<&'a ComponentId, bool> {
    let mut verdicts: HashMap<&ComponentId, bool> = pred_idx
        .iter()
        .map(|(component, record)| {
            let label_matches = match (record.first(), gt_idx.get(component)) {
                (Some(first), Some(truth)) => truth.has_label(&first.label),
                _ => false,
            };
            (component, label_matches)
        })
        .collect();

    // Refinement only ever clears verdicts, so cluster order does not matter.
    for (key, members) in pred_idx.members_by_cluster() {
        let members: Vec<&ComponentId> = members.into_iter().collect();
        for (i, &t1) in members.iter().enumerate() {
            for &t2 in &members[i + 1..] {
                if !co_clustered_under(key, t1, t2, gt_idx) {
                    verdicts.insert(t1, false);
                    verdicts.insert(t2, false);
                }
            }
        }
    }

    verdicts
}

/// True when `t1` and `t2` share a ground-truth cluster labelled like `key`
fn co_clustered_under(
    key: &ClusterKey,
    t1: &ComponentId,
    t2: &ComponentId,
    gt_idx: &ClusterMembershipIndex,
) -> bool {
    match (gt_idx.get(t1), gt_idx.get(t2)) {
        (Some(a), Some(b)) => a.shared_keys(b).any(|shared| shared.label == key.label),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cluster;

    fn partition(clusters: &[(&str, &[&str])]) -> Partition {
        clusters
            .iter()
            .map(|(label, members)| Cluster::new(*label, members.iter()))
            .collect()
    }

    #[test]
    fn test_identical_partitions_score_perfectly() {
        let gt = partition(&[
            ("DiffPair", &["m17", "m18"]),
            ("CM", &["m2", "m3"]),
            ("Inverter", &["m19", "m20", "m21"]),
        ]);
        let record = PairwiseConsistencyScorer::new().score(&gt, &gt);
        assert_eq!(record, MetricRecord::new(1.0, 1.0));
    }

    #[test]
    fn test_single_correct_pair_against_larger_truth() {
        let gt = partition(&[
            ("Inverter", &["m21", "m19", "m20"]),
            ("DiffPair", &["m17", "m18"]),
            ("CM", &["m28", "m7"]),
            ("CM", &["m28", "m9"]),
            ("CM", &["m5", "m14"]),
            ("CM", &["m25", "m1"]),
        ]);
        let predicted = partition(&[("DiffPair", &["m17", "m18"])]);

        let record = PairwiseConsistencyScorer::new().score(&predicted, &gt);

        assert_eq!(record.precision, 1.0);
        assert!((record.recall - 2.0 / 12.0).abs() < 1e-9);
        assert!((record.f1 - 0.285_714_285_714).abs() < 1e-9);
    }

    #[test]
    fn test_pair_sharing_only_other_label_is_wrong() {
        // m6 and m8 co-occur in ground truth only as a current mirror
        let gt = partition(&[("CM", &["m6", "m7", "m8"]), ("DiffPair", &["m6", "m9"])]);
        let predicted = partition(&[("DiffPair", &["m6", "m8"])]);

        let verdicts = PairwiseConsistencyScorer::new().verdicts(&predicted, &gt);

        assert_eq!(verdicts[&ComponentId::new("m6")], false);
        assert_eq!(verdicts[&ComponentId::new("m8")], false);
    }

    #[test]
    fn test_first_label_decides_before_refinement() {
        let gt = partition(&[("CM", &["m1", "m2"])]);
        let predicted = partition(&[("Inverter", &["m1"]), ("CM", &["m1", "m2"])]);

        let verdicts = PairwiseConsistencyScorer::new().verdicts(&predicted, &gt);

        assert_eq!(verdicts[&ComponentId::new("m1")], false);
        assert_eq!(verdicts[&ComponentId::new("m2")], true);
    }

    #[test]
    fn test_member_missing_from_truth_poisons_its_cluster() {
        let gt = partition(&[("CM", &["m1", "m2"])]);
        let predicted = partition(&[("CM", &["m1", "m2", "m99"])]);

        let record = PairwiseConsistencyScorer::new().score(&predicted, &gt);

        assert!(record.is_zero());
    }

    #[test]
    fn test_flat_ground_truth_switches_to_existence_mode() {
        let gt = partition(&[
            ("MosfetDiode", &["m5", "m12", "m15"]),
            ("load_cap", &["c1"]),
        ]);
        let predicted = partition(&[("load_cap", &["m5", "m12", "c1", "m40"])]);
        let scorer = PairwiseConsistencyScorer::new();

        assert_eq!(scorer.mode_for(&gt), ScoringMode::Existence);
        let record = scorer.score(&predicted, &gt);
        assert!((record.precision - 0.75).abs() < 1e-12);
        assert!((record.recall - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_mode_overrides_first_label() {
        let gt = partition(&[("MosfetDiode", &["m3"]), ("CM", &["m1", "m2"])]);
        let predicted = partition(&[("DiffPair", &["m1", "m2"])]);
        let scorer = PairwiseConsistencyScorer::new();

        assert_eq!(scorer.mode_for(&gt), ScoringMode::Existence);
        assert!(scorer
            .score_with_mode(ScoringMode::Structural, &predicted, &gt)
            .is_zero());
    }

    #[test]
    fn test_custom_flat_labels() {
        let gt = partition(&[("cap", &["c1", "c2"])]);
        let predicted = partition(&[("whatever", &["c1"])]);

        let default = PairwiseConsistencyScorer::new();
        assert_eq!(default.mode_for(&gt), ScoringMode::Structural);
        assert!(default.score(&predicted, &gt).is_zero());

        let custom = PairwiseConsistencyScorer::with_flat_labels(["cap"]);
        assert_eq!(custom.score(&predicted, &gt), MetricRecord::new(1.0, 0.5));
    }

    #[test]
    fn test_empty_inputs_are_zero() {
        let empty = Partition::default();
        let gt = partition(&[("CM", &["m1", "m2"])]);
        let scorer = PairwiseConsistencyScorer::new();

        assert!(scorer.score(&empty, &gt).is_zero());
        assert!(scorer.score(&gt, &empty).is_zero());
        assert!(scorer.score(&empty, &empty).is_zero());
    }

    #[test]
    fn test_overlapping_truth_clusters_accept_either_label() {
        // m21, m22 are both inverter and current-mirror members
        let gt = partition(&[
            ("Inverter", &["m21", "m22", "m19", "m20"]),
            ("CM", &["m21", "m22", "m29", "m30"]),
        ]);
        let predicted = partition(&[("CM", &["m21", "m22"]), ("Inverter", &["m19", "m20"])]);

        let record = PairwiseConsistencyScorer::new().score(&predicted, &gt);

        assert_eq!(record.precision, 1.0);
        assert!((record.recall - 4.0 / 6.0).abs() < 1e-12);
    }
}
