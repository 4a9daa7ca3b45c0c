use std::fmt::Display;
use std::str::FromStr;

use checks_happy_core::thresholds::{
    ChangeThresholds, DEFAULT_MINOR_THRESHOLD, DEFAULT_SIGNIFICANT_THRESHOLD,
    DEFAULT_UNCHANGED_THRESHOLD,
};

use crate::error::{CliError, CliResult};

/// Log line format for the stderr subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AmendConfig {
    /// Similarity boundaries for script change classification.
    pub thresholds: ChangeThresholds,
    /// Pretty-print JSON output (default: `true`).
    pub pretty_json: bool,
    pub log_format: LogFormat,
}

impl Default for AmendConfig {
    fn default() -> Self {
        Self {
            thresholds: ChangeThresholds::default(),
            pretty_json: true,
            log_format: LogFormat::default(),
        }
    }
}

impl AmendConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default |
    /// |-------------------------------|---------|
    /// | `AMEND_UNCHANGED_THRESHOLD`   | `95`    |
    /// | `AMEND_MINOR_THRESHOLD`       | `80`    |
    /// | `AMEND_SIGNIFICANT_THRESHOLD` | `50`    |
    /// | `AMEND_PRETTY_JSON`           | `true`  |
    /// | `LOG_FORMAT`                  | `text`  |
    ///
    /// A variable that is set but does not parse is an error, as are
    /// thresholds that fail [`ChangeThresholds::validate`].
    pub fn from_env() -> CliResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`AmendConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CliResult<Self> {
        let thresholds = ChangeThresholds {
            unchanged: parse_var(
                &lookup,
                "AMEND_UNCHANGED_THRESHOLD",
                DEFAULT_UNCHANGED_THRESHOLD,
            )?,
            minor: parse_var(&lookup, "AMEND_MINOR_THRESHOLD", DEFAULT_MINOR_THRESHOLD)?,
            significant: parse_var(
                &lookup,
                "AMEND_SIGNIFICANT_THRESHOLD",
                DEFAULT_SIGNIFICANT_THRESHOLD,
            )?,
        };
        thresholds.validate()?;

        Ok(Self {
            thresholds,
            pretty_json: parse_var(&lookup, "AMEND_PRETTY_JSON", true)?,
            log_format: parse_var(&lookup, "LOG_FORMAT", LogFormat::default())?,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> CliResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CliError::Config(format!("{name}={raw:?}: {e}"))),
    }
}
