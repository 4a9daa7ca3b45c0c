//! Classification of a scene between two script revisions.
//!
//! Shared by the comparator, the merger, and anything rendering a review
//! list, so the wire names stay in one place.

use serde::{Deserialize, Serialize};

/// The status of a scene in a script amendment comparison.
///
/// - `New`       -- scene number present only in the revised script.
/// - `Modified`  -- present in both, content similarity below the
///   unchanged threshold.
/// - `Deleted`   -- present only in the existing breakdown.
/// - `Unchanged` -- present in both with near-identical content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneChangeStatus {
    New,
    Modified,
    Deleted,
    Unchanged,
}

impl SceneChangeStatus {
    /// String representation for display, logging, and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Unchanged => "unchanged",
        }
    }

    /// `true` for every status except `Unchanged`.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl std::fmt::Display for SceneChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
