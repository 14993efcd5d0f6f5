//! Terminal styling for reports.
//!
//! Colors are decided once from the environment (`NO_COLOR`, `CLICOLOR`,
//! `CLICOLOR_FORCE`, `TERM`) and carried by a formatter; writers never
//! consult the environment themselves.

use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve from the raw values of `NO_COLOR`, `CLICOLOR` and `CLICOLOR_FORCE`.
    ///
    /// `CLICOLOR_FORCE=1` wins over everything; `NO_COLOR` (any value) or
    /// `CLICOLOR=0` turn colors off.
    pub fn from_vars(
        no_color: Option<&str>,
        clicolor: Option<&str>,
        clicolor_force: Option<&str>,
    ) -> Self {
        if clicolor_force == Some("1") {
            Self::Always
        } else if no_color.is_some() || clicolor == Some("0") {
            Self::Never
        } else {
            Self::Auto
        }
    }

    pub fn from_env() -> Self {
        let var = |name| env::var(name).ok();
        Self::from_vars(
            var("NO_COLOR").as_deref(),
            var("CLICOLOR").as_deref(),
            var("CLICOLOR_FORCE").as_deref(),
        )
    }

    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => stdout_supports_color(),
        }
    }
}

fn stdout_supports_color() -> bool {
    let dumb = env::var("TERM").is_ok_and(|term| term == "dumb");
    !dumb && std::io::stdout().is_terminal()
}

/// Quality band of a score in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// >= 0.8
    Strong,
    /// >= 0.5
    Partial,
    Weak,
}

impl ScoreBand {
    pub fn of(value: f64) -> Self {
        if value >= 0.8 {
            Self::Strong
        } else if value >= 0.5 {
            Self::Partial
        } else {
            Self::Weak
        }
    }
}

pub trait OutputFormatter {
    fn header(&self, text: &str) -> String;
    fn dim(&self, text: &str) -> String;
    fn score(&self, band: ScoreBand, text: &str) -> String;
}

pub struct ColoredFormatter;

impl OutputFormatter for ColoredFormatter {
    fn header(&self, text: &str) -> String {
        text.blue().bold().to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.dimmed().to_string()
    }

    fn score(&self, band: ScoreBand, text: &str) -> String {
        match band {
            ScoreBand::Strong => text.green(),
            ScoreBand::Partial => text.yellow(),
            ScoreBand::Weak => text.red(),
        }
        .to_string()
    }
}

pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn header(&self, text: &str) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }

    fn score(&self, _band: ScoreBand, text: &str) -> String {
        text.to_string()
    }
}

/// Formatter for the current environment
pub fn formatter_from_env() -> Box<dyn OutputFormatter> {
    if ColorMode::from_env().should_use_color() {
        // colored runs its own tty check; keep it consistent with ours
        colored::control::set_override(true);
        Box::new(ColoredFormatter)
    } else {
        Box::new(PlainFormatter)
    }
}

/// Render `text` in the color of `value`'s band
pub fn score_band(formatter: &dyn OutputFormatter, value: f64, text: &str) -> String {
    formatter.score(ScoreBand::of(value), text)
}
