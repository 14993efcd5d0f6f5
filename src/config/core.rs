use serde::{Deserialize, Serialize};

use super::parallel::ParallelConfig;
use crate::io::output::OutputFormat;
use crate::scoring::{Strategy, DEFAULT_FLAT_LABELS};

/// Root configuration structure, read from `.clustereval.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EvalConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Ground-truth canonicalization before scoring
    #[serde(default)]
    pub merge: MergeConfig,

    #[serde(default)]
    pub parallel: ParallelConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    #[serde(default)]
    pub strategy: Strategy,

    /// Labels whose ground truth is scored by existence only
    #[serde(default = "default_flat_labels")]
    pub flat_labels: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            flat_labels: default_flat_labels(),
        }
    }
}

fn default_flat_labels() -> Vec<String> {
    DEFAULT_FLAT_LABELS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Labels whose overlapping ground-truth clusters are unioned
    #[serde(default = "default_merge_labels")]
    pub labels: Vec<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            labels: default_merge_labels(),
        }
    }
}

impl MergeConfig {
    /// Labels to merge, empty when merging is disabled
    pub fn active_labels(&self) -> &[String] {
        if self.enabled {
            &self.labels
        } else {
            &[]
        }
    }
}

fn default_merge_labels() -> Vec<String> {
    vec!["CM".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Digits after the decimal point in terminal and markdown tables
    #[serde(default = "default_decimals")]
    pub decimals: usize,

    /// Include one row per instance in addition to the averages
    #[serde(default)]
    pub per_instance: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            decimals: default_decimals(),
            per_instance: false,
        }
    }
}

fn default_decimals() -> usize {
    4
}

fn default_true() -> bool {
    true
}
