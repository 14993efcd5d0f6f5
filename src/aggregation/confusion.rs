use crate::core::Partition;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Ground-truth label -> predicted label -> overlapping member count.
///
/// Every (truth cluster, predicted cluster) pair with a non-empty member
/// intersection contributes its intersection size to the labels' cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfusionMatrix {
    cells: BTreeMap<String, BTreeMap<String, u64>>,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(ground_truth: &Partition, predicted: &Partition) -> Self {
        let predicted_sets: Vec<_> = predicted
            .iter()
            .map(|p| (p.label.as_str(), p.member_set()))
            .collect();

        let mut matrix = Self::new();
        for g in ground_truth {
            let g_members = g.member_set();
            for (p_label, p_members) in &predicted_sets {
                let overlap = g_members.intersection(p_members).count() as u64;
                if overlap > 0 {
                    matrix.add(&g.label, p_label, overlap);
                }
            }
        }
        matrix
    }

    /// Element-wise sum of many matrices
    pub fn aggregate<I>(matrices: I) -> Self
    where
        I: IntoIterator<Item = ConfusionMatrix>,
    {
        matrices.into_iter().fold(Self::new(), |mut acc, m| {
            acc.merge(&m);
            acc
        })
    }

    pub fn merge(&mut self, other: &ConfusionMatrix) {
        for (truth, row) in &other.cells {
            for (guess, count) in row {
                self.add(truth, guess, *count);
            }
        }
    }

    pub fn add(&mut self, truth: &str, guess: &str, count: u64) {
        *self
            .cells
            .entry(truth.to_string())
            .or_default()
            .entry(guess.to_string())
            .or_default() += count;
    }

    pub fn get(&self, truth: &str, guess: &str) -> u64 {
        self.cells
            .get(truth)
            .and_then(|row| row.get(guess))
            .copied()
            .unwrap_or(0)
    }

    pub fn row(&self, truth: &str) -> Option<&BTreeMap<String, u64>> {
        self.cells.get(truth)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, u64>)> {
        self.cells.iter()
    }

    pub fn ground_truth_labels(&self) -> BTreeSet<&str> {
        self.cells.keys().map(String::as_str).collect()
    }

    pub fn predicted_labels(&self) -> BTreeSet<&str> {
        self.cells
            .values()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect()
    }

    /// Sum of the cells where both labels agree
    pub fn diagonal_total(&self) -> u64 {
        self.cells
            .iter()
            .filter_map(|(truth, row)| row.get(truth))
            .sum()
    }

    pub fn total(&self) -> u64 {
        self.cells.values().flat_map(|row| row.values()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
