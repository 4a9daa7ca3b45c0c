//! Schedule amendment engine: compare a re-issued shooting schedule with
//! the current one, then merge.
//!
//! Scenes match on [`ScheduleSceneKey`] (spacing and case ignored). One
//! scene can carry several changes at once: moved and recast are reported
//! as two records. The merge takes the new schedule as the base and reverts
//! field by field whatever the user declined; the script engine works the
//! other way round.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::scene_number::{find_duplicate_keys, ScheduleSceneKey};
use crate::schedule::{ProductionSchedule, ScheduleDay, ScheduleSceneEntry};
use crate::summary::SummaryBuilder;
use crate::types::{CastNumber, DayNumber};

/// Placeholder for an absent timing value in change descriptions.
pub const NONE_LABEL: &str = "none";

// ---------------------------------------------------------------------------
// Change types
// ---------------------------------------------------------------------------

/// Kind of scene-level schedule change. Not exclusive per scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleChangeType {
    SceneAdded,
    SceneRemoved,
    SceneMoved,
    CastChanged,
    TimingChanged,
}

impl ScheduleChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SceneAdded => "scene_added",
            Self::SceneRemoved => "scene_removed",
            Self::SceneMoved => "scene_moved",
            Self::CastChanged => "cast_changed",
            Self::TimingChanged => "timing_changed",
        }
    }
}

impl std::fmt::Display for ScheduleChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of day-level schedule change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayChangeType {
    DayAdded,
    DayRemoved,
    DayModified,
}

/// One scene-level difference between two schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSceneChange {
    /// Scene number as printed on the newest schedule that has it.
    pub scene_number: String,
    pub scene_key: ScheduleSceneKey,
    pub change_type: ScheduleChangeType,
    pub old_day: Option<DayNumber>,
    pub new_day: Option<DayNumber>,
    pub old_entry: Option<ScheduleSceneEntry>,
    pub new_entry: Option<ScheduleSceneEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cast_added: Vec<CastNumber>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cast_removed: Vec<CastNumber>,
    pub description: String,
}

impl ScheduleSceneChange {
    fn between(
        change_type: ScheduleChangeType,
        key: &ScheduleSceneKey,
        old: Option<Placement<'_>>,
        new: Option<Placement<'_>>,
        description: String,
    ) -> Self {
        let scene_number = new
            .or(old)
            .map(|p| p.entry.scene_number.clone())
            .unwrap_or_else(|| key.to_string());
        Self {
            scene_number,
            scene_key: key.clone(),
            change_type,
            old_day: old.map(|p| p.day),
            new_day: new.map(|p| p.day),
            old_entry: old.map(|p| p.entry.clone()),
            new_entry: new.map(|p| p.entry.clone()),
            cast_added: Vec::new(),
            cast_removed: Vec::new(),
            description,
        }
    }

    fn touches_day(&self, day: DayNumber) -> bool {
        self.old_day == Some(day) || self.new_day == Some(day)
    }
}

/// A shoot day that appeared, disappeared, or has scene changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayChange {
    pub day_number: DayNumber,
    pub change_type: DayChangeType,
    pub scene_changes: Vec<ScheduleSceneChange>,
}

/// Output of [`compare_schedule_amendment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAmendmentResult {
    pub scene_changes: Vec<ScheduleSceneChange>,
    /// Sorted by day number.
    pub day_changes: Vec<DayChange>,
    pub added_scenes: Vec<ScheduleSceneChange>,
    pub removed_scenes: Vec<ScheduleSceneChange>,
    pub moved_scenes: Vec<ScheduleSceneChange>,
    pub cast_changes: Vec<ScheduleSceneChange>,
    pub timing_changes: Vec<ScheduleSceneChange>,
    pub summary: String,
    pub has_changes: bool,
}

impl ScheduleAmendmentResult {
    fn of_type(
        &self,
        change_type: ScheduleChangeType,
    ) -> impl Iterator<Item = &ScheduleSceneChange> {
        self.scene_changes
            .iter()
            .filter(move |c| c.change_type == change_type)
    }
}

/// Which schedule changes to accept. Everything is accepted by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleAmendmentOptions {
    pub include_added_scenes: bool,
    pub include_removed_scenes: bool,
    pub include_moved_scenes: bool,
    pub include_cast_changes: bool,
    pub include_timing_changes: bool,
}

impl Default for ScheduleAmendmentOptions {
    fn default() -> Self {
        Self {
            include_added_scenes: true,
            include_removed_scenes: true,
            include_moved_scenes: true,
            include_cast_changes: true,
            include_timing_changes: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Indexing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Placement<'a> {
    day: DayNumber,
    entry: &'a ScheduleSceneEntry,
}

/// Scene key -> placement, iterated in first-seen order. A key seen twice
/// keeps its first position but the last placement.
struct ScheduleIndex<'a> {
    order: Vec<ScheduleSceneKey>,
    by_key: HashMap<ScheduleSceneKey, Placement<'a>>,
}

impl<'a> ScheduleIndex<'a> {
    fn build(schedule: &'a ProductionSchedule, side: &str) -> Self {
        let mut order = Vec::new();
        let mut by_key = HashMap::new();
        for day in &schedule.days {
            for entry in &day.scenes {
                let key = entry.key();
                let placement = Placement {
                    day: day.day_number,
                    entry,
                };
                if by_key.insert(key.clone(), placement).is_none() {
                    order.push(key);
                }
            }
        }

        let duplicates = find_duplicate_keys(
            schedule
                .days
                .iter()
                .flat_map(|d| d.scenes.iter().map(ScheduleSceneEntry::key)),
        );
        if !duplicates.is_empty() {
            tracing::warn!(
                side,
                duplicates = ?duplicates,
                "Scene scheduled more than once; keeping the last placement",
            );
        }

        Self { order, by_key }
    }

    fn get(&self, key: &ScheduleSceneKey) -> Option<Placement<'a>> {
        self.by_key.get(key).copied()
    }

    fn iter(&self) -> impl Iterator<Item = (&ScheduleSceneKey, Placement<'a>)> + '_ {
        self.order.iter().map(move |k| (k, self.by_key[k]))
    }
}

// ---------------------------------------------------------------------------
// Compare
// ---------------------------------------------------------------------------

/// Compare the current schedule with a newly parsed one.
pub fn compare_schedule_amendment(
    existing: &ProductionSchedule,
    new: &ProductionSchedule,
) -> ScheduleAmendmentResult {
    let old_index = ScheduleIndex::build(existing, "existing");
    let new_index = ScheduleIndex::build(new, "new");
    let mut changes = Vec::new();

    for (key, placed) in new_index.iter() {
        let Some(prior) = old_index.get(key) else {
            changes.push(ScheduleSceneChange::between(
                ScheduleChangeType::SceneAdded,
                key,
                None,
                Some(placed),
                format!("Added to Day {}", placed.day),
            ));
            continue;
        };

        let moved = prior.day != placed.day;
        if moved {
            changes.push(ScheduleSceneChange::between(
                ScheduleChangeType::SceneMoved,
                key,
                Some(prior),
                Some(placed),
                format!("Moved from Day {} to Day {}", prior.day, placed.day),
            ));
        }

        if let Some(change) = cast_change(key, prior, placed) {
            changes.push(change);
        }

        // A move already explains a new call time or order.
        if !moved {
            if let Some(change) = timing_change(key, prior, placed) {
                changes.push(change);
            }
        }
    }

    for (key, prior) in old_index.iter() {
        if new_index.get(key).is_none() {
            changes.push(ScheduleSceneChange::between(
                ScheduleChangeType::SceneRemoved,
                key,
                Some(prior),
                None,
                format!("Removed from Day {}", prior.day),
            ));
        }
    }

    let day_changes = day_changes(existing, new, &changes);
    let result = categorize(changes, day_changes);
    tracing::debug!(
        added = result.added_scenes.len(),
        removed = result.removed_scenes.len(),
        moved = result.moved_scenes.len(),
        cast = result.cast_changes.len(),
        timing = result.timing_changes.len(),
        days = result.day_changes.len(),
        "Compared schedule amendment",
    );
    result
}

fn cast_change(
    key: &ScheduleSceneKey,
    prior: Placement<'_>,
    placed: Placement<'_>,
) -> Option<ScheduleSceneChange> {
    let old_cast: BTreeSet<CastNumber> = prior.entry.cast_numbers.iter().copied().collect();
    let new_cast: BTreeSet<CastNumber> = placed.entry.cast_numbers.iter().copied().collect();
    let added: Vec<CastNumber> = new_cast.difference(&old_cast).copied().collect();
    let removed: Vec<CastNumber> = old_cast.difference(&new_cast).copied().collect();
    if added.is_empty() && removed.is_empty() {
        return None;
    }

    let mut parts = Vec::new();
    if !added.is_empty() {
        parts.push(format!("{} cast added", added.len()));
    }
    if !removed.is_empty() {
        parts.push(format!("{} cast removed", removed.len()));
    }

    let mut change = ScheduleSceneChange::between(
        ScheduleChangeType::CastChanged,
        key,
        Some(prior),
        Some(placed),
        parts.join(", "),
    );
    change.cast_added = added;
    change.cast_removed = removed;
    Some(change)
}

fn timing_change(
    key: &ScheduleSceneKey,
    prior: Placement<'_>,
    placed: Placement<'_>,
) -> Option<ScheduleSceneChange> {
    let (old, new) = (prior.entry, placed.entry);
    let mut parts = Vec::new();
    if old.estimated_time != new.estimated_time {
        parts.push(field_change("time", &old.estimated_time, &new.estimated_time));
    }
    if old.shoot_order != new.shoot_order {
        parts.push(field_change("order", &old.shoot_order, &new.shoot_order));
    }
    if old.pages != new.pages {
        parts.push(field_change("pages", &old.pages, &new.pages));
    }
    if parts.is_empty() {
        return None;
    }

    Some(ScheduleSceneChange::between(
        ScheduleChangeType::TimingChanged,
        key,
        Some(prior),
        Some(placed),
        parts.join(", "),
    ))
}

fn field_change<T: std::fmt::Display>(label: &str, old: &Option<T>, new: &Option<T>) -> String {
    let show = |v: &Option<T>| {
        v.as_ref()
            .map_or_else(|| NONE_LABEL.to_string(), |v| v.to_string())
    };
    format!("{label}: {} → {}", show(old), show(new))
}

fn day_changes(
    existing: &ProductionSchedule,
    new: &ProductionSchedule,
    changes: &[ScheduleSceneChange],
) -> Vec<DayChange> {
    let old_days: BTreeSet<DayNumber> = existing.days.iter().map(|d| d.day_number).collect();
    let new_days: BTreeSet<DayNumber> = new.days.iter().map(|d| d.day_number).collect();
    let mut result = Vec::new();

    for &day in new_days.union(&old_days) {
        let (change_type, scene_changes): (DayChangeType, Vec<ScheduleSceneChange>) =
            match (old_days.contains(&day), new_days.contains(&day)) {
                (false, true) => (
                    DayChangeType::DayAdded,
                    changes
                        .iter()
                        .filter(|c| c.new_day == Some(day))
                        .cloned()
                        .collect(),
                ),
                (true, false) => (
                    DayChangeType::DayRemoved,
                    changes
                        .iter()
                        .filter(|c| c.old_day == Some(day))
                        .cloned()
                        .collect(),
                ),
                _ => {
                    let touched: Vec<ScheduleSceneChange> = changes
                        .iter()
                        .filter(|c| c.touches_day(day))
                        .cloned()
                        .collect();
                    if touched.is_empty() {
                        continue;
                    }
                    (DayChangeType::DayModified, touched)
                }
            };
        result.push(DayChange {
            day_number: day,
            change_type,
            scene_changes,
        });
    }
    result
}

fn categorize(
    scene_changes: Vec<ScheduleSceneChange>,
    day_changes: Vec<DayChange>,
) -> ScheduleAmendmentResult {
    let of_type = |change_type: ScheduleChangeType| -> Vec<ScheduleSceneChange> {
        scene_changes
            .iter()
            .filter(|c| c.change_type == change_type)
            .cloned()
            .collect()
    };
    let added_scenes = of_type(ScheduleChangeType::SceneAdded);
    let removed_scenes = of_type(ScheduleChangeType::SceneRemoved);
    let moved_scenes = of_type(ScheduleChangeType::SceneMoved);
    let cast_changes = of_type(ScheduleChangeType::CastChanged);
    let timing_changes = of_type(ScheduleChangeType::TimingChanged);

    let count_days = |t: DayChangeType| day_changes.iter().filter(|d| d.change_type == t).count();
    let summary = SummaryBuilder::new()
        .count(added_scenes.len(), "scene added", "scenes added")
        .count(removed_scenes.len(), "scene removed", "scenes removed")
        .count(moved_scenes.len(), "scene moved", "scenes moved")
        .count(cast_changes.len(), "cast change", "cast changes")
        .count(timing_changes.len(), "timing change", "timing changes")
        .count(count_days(DayChangeType::DayAdded), "day added", "days added")
        .count(count_days(DayChangeType::DayRemoved), "day removed", "days removed")
        .build();
    let has_changes = !scene_changes.is_empty() || !day_changes.is_empty();

    ScheduleAmendmentResult {
        scene_changes,
        day_changes,
        added_scenes,
        removed_scenes,
        moved_scenes,
        cast_changes,
        timing_changes,
        summary,
        has_changes,
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge a schedule comparison.
///
/// The new schedule's days and scene order are the base. Declined changes
/// are reverted from the existing schedule:
///
/// - added scenes are dropped,
/// - removed scenes and removed days are put back on their original day,
/// - moved scenes stay on their original day with their original timing,
/// - cast or timing fields are restored from the old entry.
///
/// Cast members are never dropped: anyone only on the old cast list is
/// kept. Days and cast are sorted by number.
pub fn apply_schedule_amendment(
    existing: &ProductionSchedule,
    new: &ProductionSchedule,
    result: &ScheduleAmendmentResult,
    options: &ScheduleAmendmentOptions,
) -> ProductionSchedule {
    let old_index = ScheduleIndex::build(existing, "existing");

    let added: HashSet<&ScheduleSceneKey> = result
        .of_type(ScheduleChangeType::SceneAdded)
        .map(|c| &c.scene_key)
        .collect();
    let moved: HashSet<&ScheduleSceneKey> = result
        .of_type(ScheduleChangeType::SceneMoved)
        .map(|c| &c.scene_key)
        .collect();

    // 1. New structure, minus declined additions and moves.
    let mut held_back: Vec<(DayNumber, ScheduleSceneEntry)> = Vec::new();
    let mut days: Vec<ScheduleDay> = Vec::with_capacity(new.days.len());
    for day in &new.days {
        let mut scenes = Vec::with_capacity(day.scenes.len());
        for entry in &day.scenes {
            let key = entry.key();
            if !options.include_added_scenes && added.contains(&key) {
                continue;
            }
            let prior = old_index.get(&key);
            let mut merged = merge_entry(entry, prior.map(|p| p.entry), options);
            match prior {
                Some(prior) if !options.include_moved_scenes && moved.contains(&key) => {
                    restore_timing(&mut merged, prior.entry);
                    held_back.push((prior.day, merged));
                }
                _ => scenes.push(merged),
            }
        }
        days.push(ScheduleDay {
            scenes,
            ..day.empty_copy()
        });
    }

    let mut placed: HashSet<ScheduleSceneKey> = days
        .iter()
        .flat_map(|d| d.scenes.iter().map(ScheduleSceneEntry::key))
        .collect();
    let held_keys: HashSet<ScheduleSceneKey> =
        held_back.iter().map(|(_, entry)| entry.key()).collect();

    if !options.include_removed_scenes {
        // 2. Days only the old schedule has come back whole.
        let new_day_numbers: HashSet<DayNumber> = new.days.iter().map(|d| d.day_number).collect();
        for old_day in &existing.days {
            if new_day_numbers.contains(&old_day.day_number) {
                continue;
            }
            let mut restored = old_day.empty_copy();
            for entry in &old_day.scenes {
                let key = entry.key();
                if placed.contains(&key) || held_keys.contains(&key) {
                    continue;
                }
                placed.insert(key);
                restored.scenes.push(entry.clone());
            }
            match days.iter().position(|d| d.day_number == old_day.day_number) {
                Some(idx) => days[idx].scenes.extend(restored.scenes),
                None => days.push(restored),
            }
        }

        // 3. Removed scenes go back on their original day.
        for change in result.of_type(ScheduleChangeType::SceneRemoved) {
            if placed.contains(&change.scene_key) {
                continue;
            }
            let (Some(day_number), Some(prior)) = (change.old_day, old_index.get(&change.scene_key))
            else {
                continue;
            };
            let day = day_for(&mut days, existing, day_number);
            day.scenes.push(prior.entry.clone());
            placed.insert(change.scene_key.clone());
        }
    }

    // 4. Declined moves land back on their original day.
    for (day_number, entry) in held_back {
        let key = entry.key();
        if placed.contains(&key) {
            continue;
        }
        day_for(&mut days, existing, day_number).scenes.push(entry);
        placed.insert(key);
    }

    days.sort_by_key(|d| d.day_number);

    let mut cast_list = new.cast_list.clone();
    let known: HashSet<CastNumber> = cast_list.iter().map(|m| m.number).collect();
    cast_list.extend(
        existing
            .cast_list
            .iter()
            .filter(|m| !known.contains(&m.number))
            .cloned(),
    );
    cast_list.sort_by_key(|m| m.number);

    tracing::debug!(
        days = days.len(),
        cast = cast_list.len(),
        include_added = options.include_added_scenes,
        include_removed = options.include_removed_scenes,
        include_moved = options.include_moved_scenes,
        include_cast = options.include_cast_changes,
        include_timing = options.include_timing_changes,
        "Applied schedule amendment",
    );

    ProductionSchedule {
        cast_list,
        days,
        ..new.clone()
    }
}

/// New entry with declined cast/timing fields taken from the old entry.
fn merge_entry(
    new: &ScheduleSceneEntry,
    old: Option<&ScheduleSceneEntry>,
    options: &ScheduleAmendmentOptions,
) -> ScheduleSceneEntry {
    let mut merged = new.clone();
    if let Some(old) = old {
        if !options.include_cast_changes {
            merged.cast_numbers = old.cast_numbers.clone();
        }
        if !options.include_timing_changes {
            restore_timing(&mut merged, old);
        }
    }
    merged
}

fn restore_timing(entry: &mut ScheduleSceneEntry, old: &ScheduleSceneEntry) {
    entry.estimated_time = old.estimated_time.clone();
    entry.shoot_order = old.shoot_order;
    entry.pages = old.pages.clone();
}

/// The merged day with `day_number`, created from the existing schedule's
/// day metadata if the new schedule dropped it.
fn day_for<'d>(
    days: &'d mut Vec<ScheduleDay>,
    existing: &ProductionSchedule,
    day_number: DayNumber,
) -> &'d mut ScheduleDay {
    let idx = match days.iter().position(|d| d.day_number == day_number) {
        Some(idx) => idx,
        None => {
            let shell = existing
                .day(day_number)
                .map(ScheduleDay::empty_copy)
                .unwrap_or_else(|| ScheduleDay::new(day_number));
            days.push(shell);
            days.len() - 1
        }
    };
    &mut days[idx]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
