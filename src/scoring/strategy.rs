//! Selectable correctness definitions.
//!
//! The metrics below disagree on purpose; none is the canonical one, so
//! callers pick a [`Strategy`] explicitly and the report records which.

use super::{
    ExistenceScorer, LabelPairScorer, MetricRecord, OverlapAssignmentScorer,
    PairwiseConsistencyScorer,
};
use crate::core::Partition;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Component present anywhere in ground truth
    Existence,
    /// First label must match and co-clustered components must share a same-label truth cluster
    #[default]
    Pairwise,
    /// Per-component label-set agreement, macro-averaged over components
    NodeMacro,
    /// One-vs-rest per label, macro-averaged over labels
    ClassMacro,
    /// Maximum-overlap cluster assignment, crediting label-consistent pairs
    ClusterAssignment,
    /// Flat (component, label) pair matching
    LabelPairs,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Existence,
        Strategy::Pairwise,
        Strategy::NodeMacro,
        Strategy::ClassMacro,
        Strategy::ClusterAssignment,
        Strategy::LabelPairs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Existence => "existence",
            Self::Pairwise => "pairwise",
            Self::NodeMacro => "node-macro",
            Self::ClassMacro => "class-macro",
            Self::ClusterAssignment => "cluster-assignment",
            Self::LabelPairs => "label-pairs",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|s| s.name() == normalized)
    }

    /// F1 is the harmonic mean of the reported precision and recall
    pub fn has_harmonic_f1(&self) -> bool {
        !matches!(self, Self::NodeMacro | Self::ClassMacro)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A strategy bound to its scorer configuration
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    strategy: Strategy,
    pairwise: PairwiseConsistencyScorer,
}

impl Evaluator {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            pairwise: PairwiseConsistencyScorer::default(),
        }
    }

    pub fn with_pairwise(strategy: Strategy, pairwise: PairwiseConsistencyScorer) -> Self {
        Self { strategy, pairwise }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn evaluate(&self, ground_truth: &Partition, predicted: &Partition) -> MetricRecord {
        self.evaluate_canonical(ground_truth, ground_truth, predicted)
    }

    /// Score against `canonical` ground truth (e.g. after label merging).
    ///
    /// Anything decided by cluster order, such as the pairwise scoring
    /// mode, is read from the `raw` ground truth.
    pub fn evaluate_canonical(
        &self,
        raw: &Partition,
        canonical: &Partition,
        predicted: &Partition,
    ) -> MetricRecord {
        let ground_truth = canonical;
        match self.strategy {
            Strategy::Existence => ExistenceScorer.score(predicted, ground_truth),
            Strategy::Pairwise => {
                let mode = self.pairwise.mode_for(raw);
                self.pairwise.score_with_mode(mode, predicted, ground_truth)
            }
            Strategy::NodeMacro => OverlapAssignmentScorer.node_metrics(ground_truth, predicted),
            Strategy::ClassMacro => OverlapAssignmentScorer.class_metrics(ground_truth, predicted),
            Strategy::ClusterAssignment => {
                OverlapAssignmentScorer.cluster_metrics(ground_truth, predicted)
            }
            Strategy::LabelPairs => LabelPairScorer.score(ground_truth, predicted).metrics,
        }
    }
}
