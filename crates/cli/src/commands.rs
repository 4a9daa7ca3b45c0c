//! One function per subcommand. Each loads its inputs, runs the engine, and
//! returns the typed result; rendering is left to the caller.

use std::path::Path;

use checks_happy_core::scene::{ParsedScene, Scene};
use checks_happy_core::schedule::ProductionSchedule;
use checks_happy_core::schedule_amendment::{
    apply_schedule_amendment, compare_schedule_amendment, ScheduleAmendmentOptions,
    ScheduleAmendmentResult,
};
use checks_happy_core::script_amendment::{
    apply_amendment_to_scenes, clear_amendment_flags, compare_script_amendment_with,
    AmendmentOptions, AmendmentResult,
};

use crate::config::AmendConfig;
use crate::error::CliResult;
use crate::io::read_json;

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// Compare the stored breakdown with a fresh script parse.
pub fn script_diff(
    existing: &Path,
    parsed: &Path,
    config: &AmendConfig,
) -> CliResult<AmendmentResult> {
    let existing: Vec<Scene> = read_json(existing)?;
    let parsed: Vec<ParsedScene> = read_json(parsed)?;
    let result = compare_script_amendment_with(&existing, &parsed, &config.thresholds);
    tracing::info!(summary = %result.summary, "Script comparison complete");
    Ok(result)
}

/// Compare, then merge the accepted categories into the breakdown.
pub fn script_apply(
    existing: &Path,
    parsed: &Path,
    options: &AmendmentOptions,
    config: &AmendConfig,
) -> CliResult<Vec<Scene>> {
    let existing: Vec<Scene> = read_json(existing)?;
    let parsed: Vec<ParsedScene> = read_json(parsed)?;
    let result = compare_script_amendment_with(&existing, &parsed, &config.thresholds);
    let merged = apply_amendment_to_scenes(&existing, &result, options);
    tracing::info!(
        summary = %result.summary,
        scenes = merged.len(),
        "Script amendment applied",
    );
    Ok(merged)
}

/// Clear amendment bookkeeping once the team has reviewed the changes.
pub fn script_clear_flags(scenes: &Path) -> CliResult<Vec<Scene>> {
    let scenes: Vec<Scene> = read_json(scenes)?;
    Ok(clear_amendment_flags(&scenes))
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Compare the current schedule with a re-issued one.
pub fn schedule_diff(existing: &Path, new: &Path) -> CliResult<ScheduleAmendmentResult> {
    let existing: ProductionSchedule = read_json(existing)?;
    let new: ProductionSchedule = read_json(new)?;
    let result = compare_schedule_amendment(&existing, &new);
    tracing::info!(summary = %result.summary, "Schedule comparison complete");
    Ok(result)
}

/// Compare, then merge the new schedule keeping declined changes as they were.
pub fn schedule_apply(
    existing: &Path,
    new: &Path,
    options: &ScheduleAmendmentOptions,
) -> CliResult<ProductionSchedule> {
    let existing: ProductionSchedule = read_json(existing)?;
    let new: ProductionSchedule = read_json(new)?;
    let result = compare_schedule_amendment(&existing, &new);
    let merged = apply_schedule_amendment(&existing, &new, &result, options);
    tracing::info!(
        summary = %result.summary,
        days = merged.days.len(),
        "Schedule amendment applied",
    );
    Ok(merged)
}
