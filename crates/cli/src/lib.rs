//! `checks-happy-amend` library crate.
//!
//! Loads parser output from JSON files, runs the amendment engines from
//! `checks_happy_core`, and hands typed results back to the binary in
//! `main.rs`. Split out so the commands can be integration tested.

pub mod commands;
pub mod config;
pub mod error;
pub mod io;
