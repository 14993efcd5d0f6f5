//! `.clustereval.toml` configuration.
//!
//! Every section is optional; missing values fall back to the defaults
//! documented on each field. CLI flags are layered on top by the commands.

mod core;
mod loader;
mod parallel;

pub use self::core::{EvalConfig, MergeConfig, OutputConfig, ScoringConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_file, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use parallel::ParallelConfig;

use crate::errors::Result;
use crate::scoring::PairwiseConsistencyScorer;

impl EvalConfig {
    /// Pairwise scorer honoring the configured flat labels
    pub fn pairwise_scorer(&self) -> PairwiseConsistencyScorer {
        PairwiseConsistencyScorer::with_flat_labels(self.scoring.flat_labels.iter().cloned())
    }

    /// Serialize back to TOML, as written by `clustereval init`
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Annotated default config file contents
pub fn default_config_toml() -> &'static str {
    r#"# clustereval configuration

[scoring]
# existence | pairwise | node-macro | class-macro | cluster-assignment | label-pairs
strategy = "pairwise"
# Ground truth carrying one of these labels first is scored by existence only
flat_labels = ["MosfetDiode", "load_cap", "compensation_cap"]

[merge]
# Union overlapping ground-truth clusters that share one of these labels
enabled = true
labels = ["CM"]

[parallel]
enabled = true
# max_concurrency = 4

[output]
# terminal | json | markdown
format = "terminal"
decimals = 4
per_instance = false
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_toml_parses_to_defaults() {
        let parsed = parse_and_validate_config(default_config_toml()).unwrap();
        assert_eq!(parsed, EvalConfig::default());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = EvalConfig::default();
        config.merge.labels.push("DiffPair".into());
        let text = config.to_toml().unwrap();
        assert_eq!(parse_and_validate_config(&text).unwrap(), config);
    }
}
