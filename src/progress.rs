//! Progress feedback for benchmark runs.
//!
//! Bars are drawn on stderr only when requested and stderr is a TTY, so
//! piped JSON output stays clean. `CLUSTEREVAL_QUIET` suppresses them
//! regardless of flags.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

pub const TEMPLATE_INSTANCES: &str =
    "{msg} [{bar:30}] {pos}/{len} instances ({percent}%) - {eta}";

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressConfig {
    pub enabled: bool,
    pub quiet_mode: bool,
}

impl ProgressConfig {
    pub fn from_env(enabled: bool) -> Self {
        Self {
            enabled,
            quiet_mode: std::env::var("CLUSTEREVAL_QUIET").is_ok(),
        }
    }

    pub fn should_show_progress(&self) -> bool {
        self.enabled && !self.quiet_mode && std::io::stderr().is_terminal()
    }

    /// A bar over `len` items, or a hidden bar when progress is off
    pub fn create_bar(&self, len: u64, msg: &str) -> ProgressBar {
        if !self.should_show_progress() {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::default_bar()
            .template(TEMPLATE_INSTANCES)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░  ");
        let pb = ProgressBar::new(len).with_style(style);
        pb.set_message(msg.to_string());
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_progress_is_hidden() {
        let config = ProgressConfig {
            enabled: false,
            quiet_mode: false,
        };
        assert!(config.create_bar(10, "Scoring").is_hidden());
    }

    #[test]
    fn test_quiet_mode_wins_over_flag() {
        let config = ProgressConfig {
            enabled: true,
            quiet_mode: true,
        };
        assert!(!config.should_show_progress());
    }
}
