//! Integration tests for the amendment commands.
//!
//! Inputs are written to temp files in the camelCase shape the parsers
//! produce; results are checked through their JSON encoding.

use std::path::PathBuf;

use assert_matches::assert_matches;
use serde_json::{json, Value};
use tempfile::TempDir;

use checks_happy_amend::commands;
use checks_happy_amend::config::AmendConfig;
use checks_happy_amend::error::CliError;
use checks_happy_amend::io::{read_json, write_json};
use checks_happy_core::schedule_amendment::ScheduleAmendmentOptions;
use checks_happy_core::script_amendment::AmendmentOptions;

fn write_fixture(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

fn existing_scenes() -> Value {
    json!([
        {
            "id": "6f1c1c5e-9a0b-4a53-8d7e-0c0f4b7e2a11",
            "sceneNumber": "1",
            "slugline": "INT. TRAILER - DAY",
            "scriptContent": "Jane sits at the mirror and waits for makeup.",
            "characters": ["char-jane"],
            "characterConfirmationStatus": "confirmed",
            "synopsis": "Jane gets ready"
        },
        {
            "id": "a3f9e0d2-51c4-4c6e-9d0b-7b8e2f6a9c22",
            "sceneNumber": "2",
            "slugline": "EXT. CAR PARK - NIGHT",
            "scriptContent": "Mark loads the van in the rain."
        }
    ])
}

fn parsed_scenes() -> Value {
    json!([
        {
            "sceneNumber": "1",
            "slugline": "INT. TRAILER - DAY",
            "scriptContent": "Jane sits at the mirror and waits for makeup."
        },
        {
            "sceneNumber": "1A",
            "slugline": "INT. CORRIDOR - DAY",
            "scriptContent": "Jane hurries to set."
        }
    ])
}

fn schedule(days: Value, cast: Value) -> Value {
    json!({
        "id": "0b7e3f7a-3b8e-4d43-9c55-1e2f0a6c9d10",
        "status": "complete",
        "castList": cast,
        "days": days
    })
}

// ---------------------------------------------------------------------------
// Script commands
// ---------------------------------------------------------------------------

#[test]
fn script_diff_reports_new_and_deleted_scenes() {
    let dir = TempDir::new().unwrap();
    let existing = write_fixture(&dir, "scenes.json", &existing_scenes());
    let parsed = write_fixture(&dir, "parsed.json", &parsed_scenes());

    let result = commands::script_diff(&existing, &parsed, &AmendConfig::default()).unwrap();
    let value = to_value(&result);

    assert_eq!(value["summary"], "1 new scene, 1 deleted scene");
    assert_eq!(value["hasChanges"], true);
    assert_eq!(value["newScenes"][0]["sceneNumber"], "1A");
    assert_eq!(value["newScenes"][0]["status"], "new");
    assert_eq!(value["deletedScenes"][0]["sceneNumber"], "2");
    assert_eq!(value["unchangedScenes"][0]["contentSimilarity"], 100);
}

#[test]
fn script_apply_keeps_breakdown_and_flags_deletions_on_request() {
    let dir = TempDir::new().unwrap();
    let existing = write_fixture(&dir, "scenes.json", &existing_scenes());
    let parsed = write_fixture(&dir, "parsed.json", &parsed_scenes());
    let options = AmendmentOptions {
        include_deleted: true,
        ..Default::default()
    };

    let merged =
        commands::script_apply(&existing, &parsed, &options, &AmendConfig::default()).unwrap();
    let value = to_value(&merged);
    let numbers: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["sceneNumber"].as_str().unwrap())
        .collect();

    assert_eq!(numbers, vec!["1", "1A", "2"]);
    assert_eq!(value[0]["characters"], json!(["char-jane"]));
    assert_eq!(value[0]["characterConfirmationStatus"], "confirmed");
    assert_eq!(value[1]["amendmentStatus"], "new");
    assert_eq!(value[2]["amendmentStatus"], "deleted");
    assert_eq!(value[2]["scriptContent"], "Mark loads the van in the rain.");
}

#[test]
fn script_apply_default_leaves_missing_scenes_alone() {
    let dir = TempDir::new().unwrap();
    let existing = write_fixture(&dir, "scenes.json", &existing_scenes());
    let parsed = write_fixture(&dir, "parsed.json", &parsed_scenes());

    let merged = commands::script_apply(
        &existing,
        &parsed,
        &AmendmentOptions::default(),
        &AmendConfig::default(),
    )
    .unwrap();

    assert_eq!(merged.len(), 3);
    let scene_two = merged.iter().find(|s| s.scene_number.as_str() == "2").unwrap();
    assert!(scene_two.amendment_status.is_none());
}

#[test]
fn script_clear_flags_strips_bookkeeping() {
    let dir = TempDir::new().unwrap();
    let flagged = json!([{
        "id": "6f1c1c5e-9a0b-4a53-8d7e-0c0f4b7e2a11",
        "sceneNumber": "4",
        "scriptContent": "New text.",
        "amendmentStatus": "modified",
        "amendmentNotes": "Minor dialogue or action changes",
        "previousScriptContent": "Old text."
    }]);
    let scenes = write_fixture(&dir, "flagged.json", &flagged);

    let cleared = commands::script_clear_flags(&scenes).unwrap();
    let value = to_value(&cleared);

    assert!(value[0].get("amendmentStatus").is_none());
    assert!(value[0].get("previousScriptContent").is_none());
    assert_eq!(value[0]["scriptContent"], "New text.");
}

// ---------------------------------------------------------------------------
// Schedule commands
// ---------------------------------------------------------------------------

#[test]
fn schedule_diff_reports_move_and_timing() {
    let dir = TempDir::new().unwrap();
    let old = schedule(
        json!([
            { "dayNumber": 1, "scenes": [
                { "sceneNumber": "5A", "castNumbers": [1, 2] },
                { "sceneNumber": "6", "castNumbers": [1], "estimatedTime": "09:00" }
            ]},
            { "dayNumber": 2, "scenes": [] }
        ]),
        json!([]),
    );
    let new = schedule(
        json!([
            { "dayNumber": 1, "scenes": [
                { "sceneNumber": "6", "castNumbers": [1], "estimatedTime": "09:30" }
            ]},
            { "dayNumber": 2, "scenes": [
                { "sceneNumber": "5 a", "castNumbers": [1, 2] }
            ]}
        ]),
        json!([]),
    );
    let existing = write_fixture(&dir, "old.json", &old);
    let new = write_fixture(&dir, "new.json", &new);

    let result = commands::schedule_diff(&existing, &new).unwrap();
    let value = to_value(&result);

    assert_eq!(value["movedScenes"].as_array().unwrap().len(), 1);
    assert_eq!(value["movedScenes"][0]["changeType"], "scene_moved");
    assert_eq!(value["movedScenes"][0]["sceneKey"], "5A");
    assert_eq!(value["castChanges"].as_array().unwrap().len(), 0);
    assert_eq!(value["timingChanges"][0]["description"], "time: 09:00 → 09:30");
    assert_eq!(value["summary"], "1 scene moved, 1 timing change");
}

#[test]
fn schedule_apply_keeps_declined_moves_and_all_cast() {
    let dir = TempDir::new().unwrap();
    let old = schedule(
        json!([
            { "dayNumber": 1, "location": "Stage 4", "scenes": [
                { "sceneNumber": "5", "castNumbers": [1] }
            ]}
        ]),
        json!([{ "number": 1, "name": "JANE" }, { "number": 3, "name": "MARK" }]),
    );
    let new = schedule(
        json!([
            { "dayNumber": 2, "scenes": [
                { "sceneNumber": "5", "castNumbers": [1] }
            ]}
        ]),
        json!([{ "number": 2, "name": "ALEX" }, { "number": 1, "name": "JANE" }]),
    );
    let existing = write_fixture(&dir, "old.json", &old);
    let new = write_fixture(&dir, "new.json", &new);
    let options = ScheduleAmendmentOptions {
        include_moved_scenes: false,
        ..Default::default()
    };

    let merged = commands::schedule_apply(&existing, &new, &options).unwrap();
    let value = to_value(&merged);

    assert_eq!(value["days"][0]["dayNumber"], 1);
    assert_eq!(value["days"][0]["location"], "Stage 4");
    assert_eq!(value["days"][0]["scenes"][0]["sceneNumber"], "5");
    assert_eq!(value["days"][1]["dayNumber"], 2);
    assert_eq!(value["days"][1]["scenes"], json!([]));
    let cast: Vec<u64> = value["castList"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["number"].as_u64().unwrap())
        .collect();
    assert_eq!(cast, vec![1, 2, 3]);
}

// ---------------------------------------------------------------------------
// Input and output
// ---------------------------------------------------------------------------

#[test]
fn missing_input_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let parsed = write_fixture(&dir, "parsed.json", &parsed_scenes());
    let missing = dir.path().join("nope.json");

    let err = commands::script_diff(&missing, &parsed, &AmendConfig::default()).unwrap_err();
    assert_matches!(err, CliError::Read { ref path, .. } if path == &missing);
}

#[test]
fn malformed_input_names_the_file() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    let new = write_fixture(&dir, "new.json", &schedule(json!([]), json!([])));

    let err = commands::schedule_diff(&bad, &new).unwrap_err();
    assert_matches!(err, CliError::Json { .. });
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn write_json_creates_output_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out").join("merged.json");

    write_json(&json!({ "days": [] }), Some(&output), false).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(text, "{\"days\":[]}\n");
    let back: Value = read_json(&output).unwrap();
    assert_eq!(back, json!({ "days": [] }));
}
