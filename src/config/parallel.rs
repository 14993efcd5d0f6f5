//! `[parallel]` section: how benchmark instances are spread over workers.

use serde::{Deserialize, Serialize};

/// Instance dispatch settings.
///
/// Instances are independent, so the only knobs are whether to use a rayon
/// pool at all and how many threads it gets.
///
/// ```rust
/// use clustereval::config::ParallelConfig;
///
/// let config = ParallelConfig::with_workers(4);
/// assert_eq!(config.worker_count(), Some(4));
/// assert_eq!(ParallelConfig::sequential().worker_count(), None);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParallelConfig {
    /// Score on a rayon pool; `false` scores on the calling thread
    pub enabled: bool,

    /// Pool size; absent or 0 means one thread per core
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_concurrency: None,
        }
    }
}

impl ParallelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequential() -> Self {
        Self {
            enabled: false,
            max_concurrency: None,
        }
    }

    pub fn with_workers(workers: usize) -> Self {
        Self {
            enabled: true,
            max_concurrency: Some(workers),
        }
    }

    /// Threads for the pool, `None` when instances run sequentially
    pub fn worker_count(&self) -> Option<usize> {
        self.enabled.then(|| self.effective_concurrency())
    }

    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency
            .filter(|&n| n > 0)
            .unwrap_or_else(available_cores)
    }
}

fn available_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
