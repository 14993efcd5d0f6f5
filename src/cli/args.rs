use crate::io::output::OutputFormat;
use crate::scoring::Strategy;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clustereval")]
#[command(
    about = "Score predicted functional clusters against ground truth",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score benchmark instances and print averaged precision, recall and F1
    Evaluate {
        #[command(flatten)]
        input: InputArgs,

        /// Correctness definition to score with
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long = "jobs")]
        jobs: Option<usize>,

        /// Score instances sequentially
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Include one row per instance
        #[arg(long = "per-instance")]
        per_instance: bool,

        /// Show a progress bar on stderr
        #[arg(long)]
        progress: bool,
    },

    /// Sum label confusion over benchmark instances
    Confusion {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Write a default .clustereval.toml to the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Self::Evaluate { input, .. } | Self::Confusion { input } => input.verbosity,
            Self::Init { .. } => 0,
        }
    }
}

/// Arguments shared by commands that read instances
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Instance files, or directories searched for *.json
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Merge overlapping ground-truth clusters with this label (repeatable)
    #[arg(long = "merge-label", value_name = "LABEL")]
    pub merge_labels: Vec<String>,

    /// Score ground truth exactly as given
    #[arg(long = "no-merge", conflicts_with = "merge_labels")]
    pub no_merge: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to the nearest .clustereval.toml)
    #[arg(short = 'c', long, env = "CLUSTEREVAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbosity: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::try_parse_from([
            "clustereval",
            "evaluate",
            "bench/",
            "-s",
            "cluster-assignment",
            "--merge-label",
            "CM",
            "--merge-label",
            "DiffPair",
            "-f",
            "json",
            "-j",
            "2",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.command.verbosity(), 2);
        match cli.command {
            Commands::Evaluate {
                input,
                strategy,
                jobs,
                ..
            } => {
                assert_eq!(strategy, Some(Strategy::ClusterAssignment));
                assert_eq!(jobs, Some(2));
                assert_eq!(input.merge_labels, vec!["CM", "DiffPair"]);
                assert_eq!(input.format, Some(OutputFormat::Json));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_no_merge_conflicts_with_merge_label() {
        let result = Cli::try_parse_from([
            "clustereval",
            "confusion",
            "a.json",
            "--no-merge",
            "--merge-label",
            "CM",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_paths_are_required() {
        assert!(Cli::try_parse_from(["clustereval", "evaluate"]).is_err());
    }
}
