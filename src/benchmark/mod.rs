//! Benchmark harness: load instance files, score them, average the results.

pub mod loader;
pub mod runner;

pub use loader::{discover_instance_files, load_instance, load_instances, parse_instance};
pub use runner::{BenchmarkReport, BenchmarkRunner, InstanceResult};

use crate::core::Partition;
use crate::scoring::CountObservation;
use serde::Serialize;

/// Group name used for instances that do not declare one
pub const DEFAULT_GROUP: &str = "default";

/// One evaluation item: a ground-truth partition and a prediction for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instance {
    pub name: String,
    /// Benchmark subset, e.g. `small`, `medium`, `large`
    pub group: Option<String>,
    pub ground_truth: Partition,
    pub predicted: Partition,
    /// Set for single-class counting instances, whose partitions are empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<CountPair>,
    /// Records dropped by validation across both partitions
    pub rejected: usize,
}

/// Ground-truth and predicted answers of a counting instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountPair {
    pub ground_truth: CountObservation,
    pub predicted: CountObservation,
}

impl Instance {
    pub fn new(name: impl Into<String>, ground_truth: Partition, predicted: Partition) -> Self {
        Self {
            name: name.into(),
            group: None,
            ground_truth,
            predicted,
            counts: None,
            rejected: 0,
        }
    }

    /// A counting instance, scored by count error instead of clustering
    pub fn counting(
        name: impl Into<String>,
        ground_truth: CountObservation,
        predicted: CountObservation,
    ) -> Self {
        Self {
            counts: Some(CountPair {
                ground_truth,
                predicted,
            }),
            ..Self::new(name, Partition::default(), Partition::default())
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn group_name(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_GROUP)
    }
}
