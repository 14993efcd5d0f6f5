//! Runtime setup: config resolution and CLI overrides.

use super::args::InputArgs;
use crate::config::{load_config, load_config_file, EvalConfig};
use anyhow::Result;

/// Explicit `--config` must load; otherwise discover or fall back to defaults.
pub fn resolve_config(input: &InputArgs) -> Result<EvalConfig> {
    match &input.config {
        Some(path) => Ok(load_config_file(path)?),
        None => Ok(load_config()),
    }
}

/// Layer the shared input flags over file configuration
pub fn apply_input_overrides(config: &mut EvalConfig, input: &InputArgs) {
    if input.no_merge {
        config.merge.enabled = false;
    } else if !input.merge_labels.is_empty() {
        config.merge.enabled = true;
        config.merge.labels = input.merge_labels.clone();
    }

    if let Some(format) = input.format {
        config.output.format = format;
    }
}

/// `-j N` and `--no-parallel`; `-j 0` means one worker per core
pub fn apply_parallel_overrides(config: &mut EvalConfig, jobs: Option<usize>, no_parallel: bool) {
    if let Some(jobs) = jobs {
        config.parallel.max_concurrency = Some(jobs);
    }
    if no_parallel {
        config.parallel.enabled = false;
    }
}
