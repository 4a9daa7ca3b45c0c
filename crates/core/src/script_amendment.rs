//! Script amendment engine: compare a revised script's scenes against the
//! breakdown, then merge the accepted changes.
//!
//! Matching is by exact [`SceneNumber`]. Merging starts from the existing
//! breakdown and opts changes in, so confirmed characters, synopsis, and
//! filming state survive every revision. Deletions are soft: the record is
//! flagged, never removed.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::diff::SceneChangeStatus;
use crate::scene::{ParsedScene, Scene};
use crate::scene_number::{find_duplicate_keys, sort_by_scene_number, SceneNumber};
use crate::similarity::{content_similarity, describe_change};
use crate::summary::SummaryBuilder;
use crate::thresholds::ChangeThresholds;
use crate::types::{SceneId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DESC_NEW_IN_SCRIPT: &str = "New scene added to script";
pub const DESC_NO_SIGNIFICANT_CHANGES: &str = "No significant changes";

/// Note stamped on scenes created from a revision.
pub const NOTE_NEW_SCENE: &str = "New scene added in script revision";

/// Note stamped on scenes soft-deleted by a revision.
pub const NOTE_DELETED_SCENE: &str = "Scene removed in script revision";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One scene's classification in a script comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneChange {
    pub scene_number: SceneNumber,
    pub status: SceneChangeStatus,
    pub existing_scene: Option<Scene>,
    pub new_scene: Option<ParsedScene>,
    pub change_description: String,
    /// Present whenever both sides exist.
    pub content_similarity: Option<u8>,
}

/// Output of [`compare_script_amendment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendmentResult {
    /// Every change, in scene-number order.
    pub changes: Vec<SceneChange>,
    pub new_scenes: Vec<SceneChange>,
    pub modified_scenes: Vec<SceneChange>,
    pub deleted_scenes: Vec<SceneChange>,
    pub unchanged_scenes: Vec<SceneChange>,
    pub summary: String,
    pub has_changes: bool,
}

impl AmendmentResult {
    fn from_changes(mut changes: Vec<SceneChange>) -> Self {
        sort_by_scene_number(&mut changes, |c| c.scene_number.as_str());

        let of_status = |status: SceneChangeStatus| -> Vec<SceneChange> {
            changes
                .iter()
                .filter(|c| c.status == status)
                .cloned()
                .collect()
        };
        let new_scenes = of_status(SceneChangeStatus::New);
        let modified_scenes = of_status(SceneChangeStatus::Modified);
        let deleted_scenes = of_status(SceneChangeStatus::Deleted);
        let unchanged_scenes = of_status(SceneChangeStatus::Unchanged);

        let summary = SummaryBuilder::new()
            .count(new_scenes.len(), "new scene", "new scenes")
            .count(modified_scenes.len(), "modified scene", "modified scenes")
            .count(deleted_scenes.len(), "deleted scene", "deleted scenes")
            .build();
        let has_changes =
            !(new_scenes.is_empty() && modified_scenes.is_empty() && deleted_scenes.is_empty());

        Self {
            changes,
            new_scenes,
            modified_scenes,
            deleted_scenes,
            unchanged_scenes,
            summary,
            has_changes,
        }
    }
}

/// Which categories of change to merge. Deletions are opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AmendmentOptions {
    pub include_new: bool,
    pub include_modified: bool,
    pub include_deleted: bool,
}

impl Default for AmendmentOptions {
    fn default() -> Self {
        Self {
            include_new: true,
            include_modified: true,
            include_deleted: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Compare
// ---------------------------------------------------------------------------

/// Compare the breakdown against a fresh parse using default thresholds.
pub fn compare_script_amendment(existing: &[Scene], parsed: &[ParsedScene]) -> AmendmentResult {
    compare_script_amendment_with(existing, parsed, &ChangeThresholds::default())
}

/// Compare the breakdown against a fresh parse.
///
/// Duplicate scene numbers collapse to the last record on each side.
pub fn compare_script_amendment_with(
    existing: &[Scene],
    parsed: &[ParsedScene],
    thresholds: &ChangeThresholds,
) -> AmendmentResult {
    warn_on_duplicates("existing", existing.iter().map(|s| &s.scene_number));
    warn_on_duplicates("parsed", parsed.iter().map(|s| &s.scene_number));

    let existing_by_number: HashMap<&SceneNumber, &Scene> =
        existing.iter().map(|s| (&s.scene_number, s)).collect();
    let last_parsed_index: HashMap<&SceneNumber, usize> = parsed
        .iter()
        .enumerate()
        .map(|(i, s)| (&s.scene_number, i))
        .collect();

    let mut matched: HashSet<&SceneNumber> = HashSet::new();
    let mut changes = Vec::with_capacity(existing.len().max(parsed.len()));

    for (idx, new_scene) in parsed.iter().enumerate() {
        if last_parsed_index.get(&new_scene.scene_number) != Some(&idx) {
            continue;
        }

        let Some(old_scene) = existing_by_number.get(&new_scene.scene_number) else {
            changes.push(SceneChange {
                scene_number: new_scene.scene_number.clone(),
                status: SceneChangeStatus::New,
                existing_scene: None,
                new_scene: Some(new_scene.clone()),
                change_description: DESC_NEW_IN_SCRIPT.to_string(),
                content_similarity: None,
            });
            continue;
        };

        matched.insert(&new_scene.scene_number);
        let similarity = content_similarity(old_scene.content(), new_scene.content());
        let (status, description) = if similarity >= thresholds.unchanged {
            (SceneChangeStatus::Unchanged, DESC_NO_SIGNIFICANT_CHANGES)
        } else {
            (
                SceneChangeStatus::Modified,
                describe_change(true, true, similarity, thresholds),
            )
        };

        changes.push(SceneChange {
            scene_number: new_scene.scene_number.clone(),
            status,
            existing_scene: Some((*old_scene).clone()),
            new_scene: Some(new_scene.clone()),
            change_description: description.to_string(),
            content_similarity: Some(similarity),
        });
    }

    for old_scene in existing {
        if matched.insert(&old_scene.scene_number) {
            changes.push(SceneChange {
                scene_number: old_scene.scene_number.clone(),
                status: SceneChangeStatus::Deleted,
                existing_scene: Some(old_scene.clone()),
                new_scene: None,
                change_description: describe_change(true, false, 0, thresholds).to_string(),
                content_similarity: None,
            });
        }
    }

    let result = AmendmentResult::from_changes(changes);
    tracing::debug!(
        new = result.new_scenes.len(),
        modified = result.modified_scenes.len(),
        deleted = result.deleted_scenes.len(),
        unchanged = result.unchanged_scenes.len(),
        "Compared script amendment",
    );
    result
}

fn warn_on_duplicates<'a>(side: &str, numbers: impl Iterator<Item = &'a SceneNumber>) {
    let duplicates = find_duplicate_keys(numbers);
    if !duplicates.is_empty() {
        tracing::warn!(
            side,
            duplicates = ?duplicates,
            "Duplicate scene numbers; keeping the last record for each",
        );
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge a comparison into the breakdown, stamping amendments with the
/// current time.
pub fn apply_amendment_to_scenes(
    existing: &[Scene],
    result: &AmendmentResult,
    options: &AmendmentOptions,
) -> Vec<Scene> {
    apply_amendment_to_scenes_at(existing, result, options, chrono::Utc::now())
}

/// Merge a comparison into the breakdown.
///
/// - `New` creates a fresh record from the parse.
/// - `Modified` refreshes script fields only and keeps the old text in
///   `previous_script_content`.
/// - `Deleted` flags the record; nothing is removed.
/// - `Unchanged` resets a stale amendment flag to `Unchanged`.
///
/// Changes whose option is off leave the existing record untouched.
pub fn apply_amendment_to_scenes_at(
    existing: &[Scene],
    result: &AmendmentResult,
    options: &AmendmentOptions,
    now: Timestamp,
) -> Vec<Scene> {
    let mut merged = existing.to_vec();
    let index: HashMap<SceneId, usize> =
        merged.iter().enumerate().map(|(i, s)| (s.id, i)).collect();

    for change in &result.changes {
        let slot = change
            .existing_scene
            .as_ref()
            .and_then(|s| index.get(&s.id).copied());

        match change.status {
            SceneChangeStatus::New => {
                if !options.include_new {
                    continue;
                }
                if let Some(parsed) = &change.new_scene {
                    let mut scene = Scene::from_parsed(parsed);
                    scene.amendment_status = Some(SceneChangeStatus::New);
                    scene.amendment_date = Some(now);
                    scene.amendment_notes = Some(NOTE_NEW_SCENE.to_string());
                    merged.push(scene);
                }
            }
            SceneChangeStatus::Modified => {
                if !options.include_modified {
                    continue;
                }
                if let (Some(i), Some(parsed)) = (slot, &change.new_scene) {
                    let scene = &mut merged[i];
                    scene.previous_script_content = scene.script_content.clone();
                    scene.apply_script_fields(parsed);
                    scene.amendment_status = Some(SceneChangeStatus::Modified);
                    scene.amendment_date = Some(now);
                    scene.amendment_notes = Some(change.change_description.clone());
                }
            }
            SceneChangeStatus::Deleted => {
                if !options.include_deleted {
                    continue;
                }
                if let Some(i) = slot {
                    let scene = &mut merged[i];
                    scene.amendment_status = Some(SceneChangeStatus::Deleted);
                    scene.amendment_date = Some(now);
                    scene.amendment_notes = Some(NOTE_DELETED_SCENE.to_string());
                }
            }
            SceneChangeStatus::Unchanged => {
                if let Some(i) = slot {
                    let scene = &mut merged[i];
                    if scene.amendment_status.is_some() {
                        scene.amendment_status = Some(SceneChangeStatus::Unchanged);
                    }
                }
            }
        }

        if slot.is_none() && change.status != SceneChangeStatus::New {
            tracing::debug!(
                scene_number = %change.scene_number,
                status = %change.status,
                "Change refers to a scene not in the breakdown; skipped",
            );
        }
    }

    sort_by_scene_number(&mut merged, |s| s.scene_number.as_str());
    tracing::debug!(
        scenes = merged.len(),
        include_new = options.include_new,
        include_modified = options.include_modified,
        include_deleted = options.include_deleted,
        "Applied script amendment",
    );
    merged
}

/// Drop review state once amendments have been acknowledged.
///
/// Clears status, notes, and previous content; keeps `amendment_date` as
/// history. Idempotent.
pub fn clear_amendment_flags(scenes: &[Scene]) -> Vec<Scene> {
    scenes
        .iter()
        .map(|scene| Scene {
            amendment_status: None,
            amendment_notes: None,
            previous_script_content: None,
            ..scene.clone()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
