use crate::scoring::MetricRecord;
use serde::{Deserialize, Serialize};

/// Arithmetic means of per-instance metric records
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AveragedMetrics {
    #[serde(rename = "Average Precision")]
    pub precision: f64,
    #[serde(rename = "Average Recall")]
    pub recall: f64,
    #[serde(rename = "Average F1-score")]
    pub f1: f64,
    #[serde(rename = "Average ACE", default, skip_serializing_if = "Option::is_none")]
    pub ace: Option<f64>,
    /// Number of records averaged
    #[serde(rename = "Instances", default)]
    pub count: usize,
}

/// Running sums, mergeable across worker threads
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricsAccumulator {
    count: usize,
    precision: f64,
    recall: f64,
    f1: f64,
    ace: u64,
    ace_count: usize,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: &MetricRecord) {
        self.count += 1;
        self.precision += record.precision;
        self.recall += record.recall;
        self.f1 += record.f1;
        if let Some(ace) = record.ace {
            self.ace += ace;
            self.ace_count += 1;
        }
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.count += other.count;
        self.precision += other.precision;
        self.recall += other.recall;
        self.f1 += other.f1;
        self.ace += other.ace;
        self.ace_count += other.ace_count;
        self
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Empty input yields zeros for every field, ACE included.
    pub fn finish(&self) -> AveragedMetrics {
        if self.count == 0 {
            return AveragedMetrics {
                ace: Some(0.0),
                ..AveragedMetrics::default()
            };
        }

        let n = self.count as f64;
        AveragedMetrics {
            precision: self.precision / n,
            recall: self.recall / n,
            f1: self.f1 / n,
            ace: (self.ace_count > 0).then(|| self.ace as f64 / self.ace_count as f64),
            count: self.count,
        }
    }
}

impl<'a> Extend<&'a MetricRecord> for MetricsAccumulator {
    fn extend<T: IntoIterator<Item = &'a MetricRecord>>(&mut self, iter: T) {
        for record in iter {
            self.push(record);
        }
    }
}

pub struct MetricsAverager;

impl MetricsAverager {
    pub fn average(records: &[MetricRecord]) -> AveragedMetrics {
        let mut acc = MetricsAccumulator::new();
        acc.extend(records);
        acc.finish()
    }
}
