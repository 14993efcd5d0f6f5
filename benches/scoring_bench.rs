//! Benchmarks for the scoring strategies and the benchmark runner.
//!
//! Synthetic circuits are built from a fixed recipe so runs are comparable:
//! ground truth is a chain of overlapping current mirrors plus disjoint
//! differential pairs, and the prediction shifts every cluster by one member.

use clustereval::benchmark::{BenchmarkRunner, Instance};
use clustereval::config::ParallelConfig;
use clustereval::scoring::Strategy;
use clustereval::{merge_same_label, Cluster, Evaluator, Partition};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

fn synthetic_circuit(num_clusters: usize) -> (Partition, Partition) {
    let mut ground_truth = Vec::with_capacity(num_clusters);
    let mut predicted = Vec::with_capacity(num_clusters);

    for i in 0..num_clusters {
        let base = i * 3;
        let label = if i % 3 == 0 { "DiffPair" } else { "CM" };
        ground_truth.push(Cluster::new(
            label,
            [format!("m{}", base), format!("m{}", base + 1), format!("m{}", base + 3)],
        ));
        let guess = if i % 5 == 0 { "Inverter" } else { label };
        predicted.push(Cluster::new(
            guess,
            [format!("m{}", base + 1), format!("m{}", base + 2), format!("m{}", base + 3)],
        ));
    }

    (Partition::new(ground_truth), Partition::new(predicted))
}

fn benchmark_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies");

    for size in [10, 50, 200] {
        let (gt, predicted) = synthetic_circuit(size);
        group.throughput(Throughput::Elements(size as u64));

        for strategy in Strategy::ALL {
            let evaluator = Evaluator::new(strategy);
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), size),
                &(&gt, &predicted),
                |b, (gt, predicted)| b.iter(|| evaluator.evaluate(black_box(gt), black_box(predicted))),
            );
        }
    }

    group.finish();
}

fn benchmark_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_same_label");

    for size in [50, 500, 5000] {
        let (gt, _) = synthetic_circuit(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &gt, |b, gt| {
            b.iter(|| merge_same_label(black_box(gt), "CM"))
        });
    }

    group.finish();
}

fn benchmark_runner(c: &mut Criterion) {
    let instances: Vec<Instance> = (0..64)
        .map(|i| {
            let (gt, predicted) = synthetic_circuit(20 + i % 7 * 10);
            Instance::new(format!("circuit_{}", i), gt, predicted)
                .with_group(if i % 2 == 0 { "small" } else { "large" })
        })
        .collect();

    let mut group = c.benchmark_group("runner");
    group.throughput(Throughput::Elements(instances.len() as u64));

    for (name, parallel) in [
        ("sequential", ParallelConfig::sequential()),
        ("parallel", ParallelConfig::default()),
    ] {
        let runner = BenchmarkRunner::new(Evaluator::new(Strategy::ClusterAssignment))
            .with_merge_labels(vec!["CM".to_string()])
            .with_parallel(parallel);
        group.bench_function(name, |b| b.iter(|| runner.run(black_box(&instances))));
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_strategies,
    benchmark_merge,
    benchmark_runner
);
criterion_main!(benches);
