use super::Instance;
use crate::aggregation::{AveragedMetrics, ConfusionMatrix, MetricsAccumulator};
use crate::canonical::merge_labels;
use crate::config::{EvalConfig, ParallelConfig};
use crate::core::Partition;
use crate::errors::{Error, Result};
use crate::progress::ProgressConfig;
use crate::scoring::{evaluate_count, Evaluator, MetricRecord, Strategy};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug_span, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceResult {
    pub name: String,
    pub group: String,
    #[serde(flatten)]
    pub metrics: MetricRecord,
    #[serde(skip_serializing_if = "is_zero")]
    pub rejected: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub strategy: Strategy,
    pub instances: Vec<InstanceResult>,
    /// Averages per benchmark subset, keyed by group name
    pub groups: BTreeMap<String, AveragedMetrics>,
    pub overall: AveragedMetrics,
}

impl BenchmarkReport {
    /// Average per-instance results, per group and overall
    pub fn from_results(strategy: Strategy, instances: Vec<InstanceResult>) -> Self {
        let mut per_group: BTreeMap<&str, MetricsAccumulator> = BTreeMap::new();
        let mut overall = MetricsAccumulator::new();

        for result in &instances {
            per_group
                .entry(result.group.as_str())
                .or_default()
                .push(&result.metrics);
            overall.push(&result.metrics);
        }

        let groups = per_group
            .into_iter()
            .map(|(group, acc)| (group.to_string(), acc.finish()))
            .collect();

        Self {
            strategy,
            overall: overall.finish(),
            groups,
            instances,
        }
    }
}

/// Scores benchmark instances with one strategy
#[derive(Debug, Clone)]
pub struct BenchmarkRunner {
    evaluator: Evaluator,
    merge_labels: Vec<String>,
    parallel: ParallelConfig,
    progress: ProgressConfig,
}

impl BenchmarkRunner {
    pub fn new(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            merge_labels: Vec::new(),
            parallel: ParallelConfig::default(),
            progress: ProgressConfig::default(),
        }
    }

    pub fn from_config(config: &EvalConfig) -> Self {
        let evaluator = Evaluator::with_pairwise(config.scoring.strategy, config.pairwise_scorer());
        Self::new(evaluator)
            .with_merge_labels(config.merge.active_labels().to_vec())
            .with_parallel(config.parallel.clone())
    }

    pub fn with_merge_labels(mut self, labels: Vec<String>) -> Self {
        self.merge_labels = labels;
        self
    }

    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_progress(mut self, progress: ProgressConfig) -> Self {
        self.progress = progress;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.evaluator.strategy()
    }

    /// Ground truth after merging the configured labels
    pub fn canonical_ground_truth<'a>(&self, ground_truth: &'a Partition) -> Cow<'a, Partition> {
        if self.merge_labels.is_empty() {
            Cow::Borrowed(ground_truth)
        } else {
            Cow::Owned(merge_labels(ground_truth, &self.merge_labels))
        }
    }

    pub fn evaluate_instance(&self, instance: &Instance) -> InstanceResult {
        let _span = debug_span!("evaluate_instance", name = %instance.name).entered();

        let metrics = match &instance.counts {
            Some(counts) => evaluate_count(&counts.predicted, &counts.ground_truth),
            None => {
                let ground_truth = self.canonical_ground_truth(&instance.ground_truth);
                self.evaluator.evaluate_canonical(
                    &instance.ground_truth,
                    &ground_truth,
                    &instance.predicted,
                )
            }
        };

        InstanceResult {
            name: instance.name.clone(),
            group: instance.group_name().to_string(),
            metrics,
            rejected: instance.rejected,
        }
    }

    /// Score every instance; results keep input order.
    pub fn run(&self, instances: &[Instance]) -> Result<BenchmarkReport> {
        let results = self.map_instances(instances, "Scoring", |i| self.evaluate_instance(i))?;
        let report = BenchmarkReport::from_results(self.strategy(), results);

        info!(
            strategy = %report.strategy,
            instances = report.overall.count,
            precision = report.overall.precision,
            recall = report.overall.recall,
            f1 = report.overall.f1,
            "Benchmark complete"
        );
        Ok(report)
    }

    /// Label confusion summed over every instance
    pub fn confusion(&self, instances: &[Instance]) -> Result<ConfusionMatrix> {
        let matrices = self.map_instances(instances, "Building confusion", |instance| {
            let ground_truth = self.canonical_ground_truth(&instance.ground_truth);
            ConfusionMatrix::build(&ground_truth, &instance.predicted)
        })?;
        Ok(ConfusionMatrix::aggregate(matrices))
    }

    fn map_instances<T, F>(&self, instances: &[Instance], msg: &str, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&Instance) -> T + Sync + Send,
    {
        let bar = self.progress.create_bar(instances.len() as u64, msg);

        let workers = self.parallel.worker_count().filter(|_| instances.len() > 1);
        let results = if let Some(workers) = workers {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| Error::ThreadPool(e.to_string()))?;
            pool.install(|| {
                instances
                    .par_iter()
                    .progress_with(bar.clone())
                    .map(&f)
                    .collect()
            })
        } else {
            instances
                .iter()
                .map(|instance| {
                    let out = f(instance);
                    bar.inc(1);
                    out
                })
                .collect()
        };

        bar.finish_and_clear();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cluster;
    use crate::scoring::CountObservation;
    use pretty_assertions::assert_eq;

    fn instance(name: &str, group: Option<&str>, gt: Vec<Cluster>, pred: Vec<Cluster>) -> Instance {
        let mut instance = Instance::new(name, Partition::new(gt), Partition::new(pred));
        instance.group = group.map(str::to_string);
        instance
    }

    fn sample() -> Vec<Instance> {
        vec![
            instance(
                "perfect",
                Some("small"),
                vec![Cluster::new("DiffPair", ["m1", "m2"])],
                vec![Cluster::new("DiffPair", ["m1", "m2"])],
            ),
            instance(
                "wrong",
                Some("small"),
                vec![Cluster::new("DiffPair", ["m1", "m2"])],
                vec![Cluster::new("CM", ["m1", "m2"])],
            ),
            instance(
                "ungrouped",
                None,
                vec![Cluster::new("Inverter", ["m5", "m6"])],
                vec![Cluster::new("Inverter", ["m5", "m6"])],
            ),
        ]
    }

    #[test]
    fn test_run_groups_and_orders_results() {
        let runner = BenchmarkRunner::new(Evaluator::new(Strategy::Pairwise))
            .with_parallel(ParallelConfig::sequential());

        let report = runner.run(&sample()).unwrap();

        let names: Vec<_> = report.instances.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["perfect", "wrong", "ungrouped"]);
        assert_eq!(report.groups["small"].precision, 0.5);
        assert_eq!(report.groups["small"].count, 2);
        assert_eq!(report.groups["default"].f1, 1.0);
        assert!((report.overall.recall - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let instances = sample();
        let sequential = BenchmarkRunner::new(Evaluator::new(Strategy::ClusterAssignment))
            .with_parallel(ParallelConfig::sequential())
            .run(&instances)
            .unwrap();
        let parallel = BenchmarkRunner::new(Evaluator::new(Strategy::ClusterAssignment))
            .with_parallel(ParallelConfig {
                enabled: true,
                max_concurrency: Some(2),
            })
            .run(&instances)
            .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_merge_labels_canonicalize_ground_truth() {
        let instances = vec![instance(
            "mirror",
            None,
            vec![
                Cluster::new("CM", ["m1", "m2"]),
                Cluster::new("CM", ["m2", "m3"]),
            ],
            vec![Cluster::new("CM", ["m1", "m2", "m3"])],
        )];

        let merged = BenchmarkRunner::new(Evaluator::new(Strategy::ClusterAssignment))
            .with_merge_labels(vec!["CM".into()])
            .run(&instances)
            .unwrap();
        let raw = BenchmarkRunner::new(Evaluator::new(Strategy::ClusterAssignment))
            .run(&instances)
            .unwrap();

        assert_eq!(merged.overall.f1, 1.0);
        assert!(raw.overall.f1 < 1.0);
    }

    #[test]
    fn test_merge_keeps_structural_mode_of_raw_truth() {
        // merging moves MosfetDiode to the front of the ground truth
        let instances = vec![instance(
            "mirror_then_diode",
            None,
            vec![
                Cluster::new("CM", ["m1", "m2"]),
                Cluster::new("MosfetDiode", ["m3"]),
            ],
            vec![Cluster::new("DiffPair", ["m1", "m2"])],
        )];

        let report = BenchmarkRunner::new(Evaluator::new(Strategy::Pairwise))
            .with_merge_labels(vec!["CM".into()])
            .with_parallel(ParallelConfig::sequential())
            .run(&instances)
            .unwrap();

        assert_eq!(report.overall.precision, 0.0);
        assert_eq!(report.overall.recall, 0.0);
        assert_eq!(report.overall.f1, 0.0);
    }

    #[test]
    fn test_count_instances_report_ace() {
        let instances = vec![
            Instance::counting(
                "bandgap",
                CountObservation::new(7, ["m5", "m18", "m19", "m15", "m12", "m20", "m16"]),
                CountObservation::new(6, ["m5", "m12", "m15", "m16", "m18", "m19"]),
            ),
            Instance::counting(
                "ldo",
                CountObservation::new(2, ["m1", "m2"]),
                CountObservation::new(5, ["m1", "m2"]),
            ),
        ];

        let report = BenchmarkRunner::new(Evaluator::new(Strategy::Pairwise))
            .with_parallel(ParallelConfig::sequential())
            .run(&instances)
            .unwrap();

        assert_eq!(report.instances[0].metrics.ace, Some(1));
        assert_eq!(report.instances[1].metrics.ace, Some(3));
        assert_eq!(report.overall.ace, Some(2.0));
        assert_eq!(report.overall.precision, 1.0);
    }

    #[test]
    fn test_confusion_aggregates_instances() {
        let runner = BenchmarkRunner::new(Evaluator::default());
        let matrix = runner.confusion(&sample()).unwrap();

        assert_eq!(matrix.get("DiffPair", "DiffPair"), 2);
        assert_eq!(matrix.get("DiffPair", "CM"), 2);
        assert_eq!(matrix.get("Inverter", "Inverter"), 2);
    }

    #[test]
    fn test_empty_run_reports_zeros() {
        let report = BenchmarkRunner::new(Evaluator::default()).run(&[]).unwrap();
        assert!(report.instances.is_empty());
        assert!(report.groups.is_empty());
        assert_eq!(report.overall.ace, Some(0.0));
    }
}
