// Export modules for library usage
pub mod aggregation;
pub mod benchmark;
pub mod canonical;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod formatting;
pub mod index;
pub mod io;
pub mod observability;
pub mod progress;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::validation::{validate_records, ValidationOutcome};
pub use crate::core::{Cluster, ClusterKey, ComponentId, Partition};

pub use crate::index::{ClusterMembershipIndex, MembershipRecord};

pub use crate::canonical::{merge_labels, merge_same_label, UnionFind};

pub use crate::scoring::{
    evaluate_count, solve_assignment, CountObservation, Evaluator, ExistenceScorer,
    LabelPairScorer, MetricRecord, OverlapAssignmentScorer, OverlapReport,
    PairwiseConsistencyScorer, Strategy,
};

pub use crate::aggregation::{AveragedMetrics, ConfusionMatrix, MetricsAccumulator, MetricsAverager};

pub use crate::benchmark::{BenchmarkReport, BenchmarkRunner, Instance};

pub use crate::config::EvalConfig;

pub use crate::errors::{Error, Result};
