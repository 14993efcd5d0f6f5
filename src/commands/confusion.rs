use super::evaluate::formatter_for;
use crate::aggregation::ConfusionMatrix;
use crate::benchmark::{load_instances, BenchmarkRunner};
use crate::config::EvalConfig;
use crate::io::{create_writer, open_sink, RenderOptions};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ConfusionConfig {
    pub paths: Vec<PathBuf>,
    pub config: EvalConfig,
    pub output: Option<PathBuf>,
}

pub fn handle_confusion(config: ConfusionConfig) -> Result<ConfusionMatrix> {
    let instances = load_instances(&config.paths).context("Failed to load benchmark instances")?;
    let matrix = BenchmarkRunner::from_config(&config.config).confusion(&instances)?;

    let sink = open_sink(config.output.as_deref())
        .with_context(|| format!("Failed to open output {:?}", config.output))?;
    let options = RenderOptions {
        decimals: config.config.output.decimals,
        per_instance: false,
    };
    let mut writer = create_writer(
        config.config.output.format,
        options,
        formatter_for(config.output.is_some()),
        sink,
    );
    writer.write_confusion(&matrix)?;
    writer.flush()?;

    Ok(matrix)
}
