//! `checks-happy-core` -- amendment engine for script and schedule revisions.
//!
//! Compares a freshly parsed script or shooting schedule against the
//! production's curated data, classifies the differences, and merges the
//! accepted changes while keeping breakdown and continuity information the
//! team entered by hand. Everything here is synchronous and free of I/O;
//! callers own loading and persistence.

pub mod diff;
pub mod error;
pub mod scene;
pub mod scene_number;
pub mod schedule;
pub mod schedule_amendment;
pub mod script_amendment;
pub mod similarity;
pub mod summary;
pub mod thresholds;
pub mod types;
