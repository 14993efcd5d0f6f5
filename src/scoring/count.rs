//! Single-class counting comparison, e.g. "how many diode-connected
//! transistors are there, and which ones".

use super::{ratio, MetricRecord};
use crate::core::ComponentId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountObservation {
    /// Reported count; may disagree with `components.len()`
    pub count: u64,
    pub components: Vec<ComponentId>,
}

impl CountObservation {
    pub fn new<I, S>(count: u64, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            count,
            components: components.into_iter().map(ComponentId::new).collect(),
        }
    }
}

/// Precision/recall over the named components plus the absolute count error
pub fn evaluate_count(predicted: &CountObservation, ground_truth: &CountObservation) -> MetricRecord {
    let guess: HashSet<&ComponentId> = predicted.components.iter().collect();
    let truth: HashSet<&ComponentId> = ground_truth.components.iter().collect();
    let hits = guess.intersection(&truth).count();

    MetricRecord::new(ratio(hits, guess.len()), ratio(hits, truth.len()))
        .with_ace(predicted.count.abs_diff(ground_truth.count))
}
