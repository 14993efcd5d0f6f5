use crate::benchmark::{load_instances, BenchmarkReport, BenchmarkRunner};
use crate::config::EvalConfig;
use crate::formatting::formatter_from_env;
use crate::io::{create_writer, open_sink, OutputFormat, RenderOptions};
use crate::progress::ProgressConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

/// Fully resolved settings for one `evaluate` run
#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    pub paths: Vec<PathBuf>,
    pub config: EvalConfig,
    pub output: Option<PathBuf>,
    pub progress: bool,
}

pub fn handle_evaluate(config: EvaluateConfig) -> Result<BenchmarkReport> {
    let instances = load_instances(&config.paths).context("Failed to load benchmark instances")?;
    info!("Loaded {} instances", instances.len());

    let runner = BenchmarkRunner::from_config(&config.config)
        .with_progress(ProgressConfig::from_env(config.progress));
    let report = runner.run(&instances)?;

    let options = RenderOptions {
        decimals: config.config.output.decimals,
        per_instance: config.config.output.per_instance,
    };
    write_report(&report, config.config.output.format, options, config.output)?;

    Ok(report)
}

fn write_report(
    report: &BenchmarkReport,
    format: OutputFormat,
    options: RenderOptions,
    output: Option<PathBuf>,
) -> Result<()> {
    let sink = open_sink(output.as_deref())
        .with_context(|| format!("Failed to open output {:?}", output))?;
    let mut writer = create_writer(format, options, formatter_for(output.is_some()), sink);
    writer.write_report(report)?;
    writer.flush()
}

/// Colors only make sense on an interactive stdout
pub(crate) fn formatter_for(to_file: bool) -> Box<dyn crate::formatting::OutputFormatter> {
    if to_file {
        Box::new(crate::formatting::PlainFormatter)
    } else {
        formatter_from_env()
    }
}
