//! `checks-happy-amend` -- script and schedule revision tool.
//!
//! Reads the breakdown/schedule JSON produced by the parsers, reports what a
//! new revision changes, and merges the accepted changes. Results go to
//! stdout (or `--output`); logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable                      | Default | Description                         |
//! |-------------------------------|---------|-------------------------------------|
//! | `AMEND_UNCHANGED_THRESHOLD`   | `95`    | Similarity at or above = unchanged  |
//! | `AMEND_MINOR_THRESHOLD`       | `80`    | Minor dialogue/action boundary      |
//! | `AMEND_SIGNIFICANT_THRESHOLD` | `50`    | Significant change vs. rewrite      |
//! | `AMEND_PRETTY_JSON`           | `true`  | Pretty-print JSON output            |
//! | `LOG_FORMAT`                  | `text`  | `text` or `json` log lines          |
//! | `RUST_LOG`                    | --      | Overrides the default log filter    |

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checks_happy_amend::commands;
use checks_happy_amend::config::{AmendConfig, LogFormat};
use checks_happy_amend::io::write_json;
use checks_happy_core::schedule_amendment::ScheduleAmendmentOptions;
use checks_happy_core::script_amendment::AmendmentOptions;

#[derive(Parser, Debug)]
#[command(name = "checks-happy-amend")]
#[command(about = "Compare and merge script and schedule revisions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare the scene breakdown with a newly parsed script
    ScriptDiff {
        /// Stored scenes (JSON array)
        #[arg(long)]
        existing: PathBuf,
        /// Parsed scenes from the new script (JSON array)
        #[arg(long)]
        parsed: PathBuf,
    },

    /// Merge a new script revision into the scene breakdown
    ScriptApply {
        #[arg(long)]
        existing: PathBuf,
        #[arg(long)]
        parsed: PathBuf,
        /// Do not add scenes that are new in the script
        #[arg(long)]
        no_new: bool,
        /// Do not update modified scenes
        #[arg(long)]
        no_modified: bool,
        /// Flag scenes missing from the script as deleted
        #[arg(long)]
        include_deleted: bool,
        /// Write the merged scenes here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clear amendment flags after review
    ScriptClearFlags {
        #[arg(long)]
        scenes: PathBuf,
    },

    /// Compare the current schedule with a re-issued one
    ScheduleDiff {
        #[arg(long)]
        existing: PathBuf,
        #[arg(long)]
        new: PathBuf,
    },

    /// Merge a re-issued schedule, keeping declined changes as they were
    ScheduleApply {
        #[arg(long)]
        existing: PathBuf,
        #[arg(long)]
        new: PathBuf,
        /// Drop scenes the new schedule adds
        #[arg(long)]
        skip_added: bool,
        /// Keep scenes the new schedule drops
        #[arg(long)]
        keep_removed: bool,
        /// Keep moved scenes on their original day
        #[arg(long)]
        keep_moved: bool,
        /// Keep the original cast on each scene
        #[arg(long)]
        keep_cast: bool,
        /// Keep the original call times, order, and pages
        #[arg(long)]
        keep_timing: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AmendConfig::from_env().context("loading configuration")?;
    init_tracing(config.log_format);

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "Starting checks-happy-amend");

    let pretty = config.pretty_json;
    match cli.command {
        Command::ScriptDiff { existing, parsed } => {
            let result = commands::script_diff(&existing, &parsed, &config)?;
            write_json(&result, None, pretty)?;
        }
        Command::ScriptApply {
            existing,
            parsed,
            no_new,
            no_modified,
            include_deleted,
            output,
        } => {
            let options = AmendmentOptions {
                include_new: !no_new,
                include_modified: !no_modified,
                include_deleted,
            };
            let merged = commands::script_apply(&existing, &parsed, &options, &config)?;
            write_json(&merged, output.as_deref(), pretty)?;
        }
        Command::ScriptClearFlags { scenes } => {
            let cleared = commands::script_clear_flags(&scenes)?;
            write_json(&cleared, None, pretty)?;
        }
        Command::ScheduleDiff { existing, new } => {
            let result = commands::schedule_diff(&existing, &new)?;
            write_json(&result, None, pretty)?;
        }
        Command::ScheduleApply {
            existing,
            new,
            skip_added,
            keep_removed,
            keep_moved,
            keep_cast,
            keep_timing,
            output,
        } => {
            let options = ScheduleAmendmentOptions {
                include_added_scenes: !skip_added,
                include_removed_scenes: !keep_removed,
                include_moved_scenes: !keep_moved,
                include_cast_changes: !keep_cast,
                include_timing_changes: !keep_timing,
            };
            let merged = commands::schedule_apply(&existing, &new, &options)?;
            write_json(&merged, output.as_deref(), pretty)?;
        }
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let (text, json) = match format {
        LogFormat::Text => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checks_happy_amend=info,checks_happy_core=info".into()),
        )
        .with(text)
        .with(json)
        .init();
}
