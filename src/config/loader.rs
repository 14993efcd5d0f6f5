use std::fs;
use std::path::{Path, PathBuf};

use super::core::EvalConfig;
use crate::errors::{Error, Result, ResultExt};

pub const CONFIG_FILE_NAME: &str = ".clustereval.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<EvalConfig> {
    let mut config = toml::from_str::<EvalConfig>(contents)?;

    config.merge.labels.retain(|label| !label.trim().is_empty());
    if config.output.decimals > 12 {
        return Err(Error::Config(format!(
            "output.decimals must be at most 12, got {}",
            config.output.decimals
        )));
    }

    Ok(config)
}

/// Load a config file the user named explicitly; any failure is an error.
pub fn load_config_file(path: &Path) -> Result<EvalConfig> {
    let contents = fs::read_to_string(path).context(format!("reading {}", path.display()))?;
    parse_and_validate_config(&contents).context(format!("parsing {}", path.display()))
}

/// Try loading config from a specific path, warning on anything but "not found"
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<EvalConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!(
                "Invalid config {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.clustereval.toml`.
///
/// The first file found wins. If it exists but is invalid, the search stops
/// there and defaults are used.
pub fn load_config_from(start: &Path) -> EvalConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
        .and_then(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No usable config within {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            EvalConfig::default()
        })
}

/// Discover config from the current working directory
pub fn load_config() -> EvalConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            EvalConfig::default()
        }
    }
}
