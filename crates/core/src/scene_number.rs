//! Scene-number business keys and numeric-aware ordering.
//!
//! Scene numbers are the only identity a scene keeps across revisions.
//! The two engines match them differently:
//!
//! - [`SceneNumber`] -- script engine, exact (case- and space-sensitive).
//! - [`ScheduleSceneKey`] -- schedule engine, whitespace stripped and
//!   uppercased, because schedule PDFs render "12 A" / "12a" / "12A"
//!   interchangeably.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SceneNumber
// ---------------------------------------------------------------------------

/// Human-assigned scene number as printed in the script ("12", "12A").
///
/// Compared by exact string equality. Not a primary key: two revisions of
/// the same script share no other identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneNumber(String);

impl SceneNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric-aware ordering key, see [`scene_sort_key`].
    pub fn sort_key(&self) -> f64 {
        scene_sort_key(&self.0)
    }
}

impl std::fmt::Display for SceneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneNumber {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SceneNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// ScheduleSceneKey
// ---------------------------------------------------------------------------

/// Normalised scene number used to match schedule entries across revisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleSceneKey(String);

impl ScheduleSceneKey {
    /// Strip every whitespace character and uppercase the rest.
    pub fn normalize(scene_number: &str) -> Self {
        Self(
            scene_number
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_uppercase(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScheduleSceneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Numeric ordering key for a scene number.
///
/// A single trailing letter is read as `.5`, so "12A" sorts as 12.5,
/// directly after "12". Anything that still fails to parse ("12AB",
/// "PICKUP") maps to `0.0` and sorts first.
pub fn scene_sort_key(scene_number: &str) -> f64 {
    let trimmed = scene_number.trim();
    let numeric = match trimmed.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => format!("{}.5", &trimmed[..idx]),
        _ => trimmed.to_string(),
    };
    numeric
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Stable sort by [`scene_sort_key`]; equal keys keep their input order.
pub fn sort_by_scene_number<T>(items: &mut [T], scene_number: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| {
        scene_sort_key(scene_number(a)).total_cmp(&scene_sort_key(scene_number(b)))
    });
}

// ---------------------------------------------------------------------------
// Duplicate detection
// ---------------------------------------------------------------------------

/// Keys that occur more than once in `keys`, in first-seen order.
///
/// Lookup maps built from such input keep only the last record per key;
/// callers use this to log what was collapsed.
pub fn find_duplicate_keys<K, I>(keys: I) -> Vec<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut counts: HashMap<K, usize> = HashMap::new();
    let mut order = Vec::new();
    for key in keys {
        let count = counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            order.push(key);
        }
        *count += 1;
    }
    order.into_iter().filter(|k| counts[k] > 1).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
