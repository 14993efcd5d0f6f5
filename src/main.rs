use anyhow::Result;
use clustereval::cli::{
    apply_input_overrides, apply_parallel_overrides, parse_args, resolve_config, Commands,
};
use clustereval::commands::{self, ConfusionConfig, EvaluateConfig};
use clustereval::observability::init_tracing;

// Main orchestrator function
fn main() -> Result<()> {
    let cli = parse_args();
    init_tracing(cli.command.verbosity());

    match cli.command {
        Commands::Evaluate {
            input,
            strategy,
            jobs,
            no_parallel,
            per_instance,
            progress,
        } => {
            let mut config = resolve_config(&input)?;
            apply_input_overrides(&mut config, &input);

            if let Some(strategy) = strategy {
                config.scoring.strategy = strategy;
            }
            apply_parallel_overrides(&mut config, jobs, no_parallel);
            if per_instance {
                config.output.per_instance = true;
            }

            commands::handle_evaluate(EvaluateConfig {
                paths: input.paths,
                config,
                output: input.output,
                progress,
            })?;
            Ok(())
        }
        Commands::Confusion { input } => {
            let mut config = resolve_config(&input)?;
            apply_input_overrides(&mut config, &input);

            commands::handle_confusion(ConfusionConfig {
                paths: input.paths,
                config,
                output: input.output,
            })?;
            Ok(())
        }
        Commands::Init { force } => commands::init_config(force),
    }
}
