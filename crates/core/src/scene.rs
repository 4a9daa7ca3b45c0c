//! Script-side records: the curated [`Scene`] and the transient
//! [`ParsedScene`] produced by the screenplay parser.

use serde::{Deserialize, Serialize};

use crate::diff::SceneChangeStatus;
use crate::scene_number::SceneNumber;
use crate::types::{DayNumber, SceneId, Timestamp};

// ---------------------------------------------------------------------------
// Breakdown enums
// ---------------------------------------------------------------------------

/// Whether the character list on a scene has been reviewed by the team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterConfirmationStatus {
    #[default]
    Pending,
    Confirmed,
}

/// How much of a scene has been shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilmingStatus {
    Complete,
    Partial,
    NotFilmed,
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A scene in the production's breakdown.
///
/// Script-derived fields (`slugline`, `int_ext`, `time_of_day`,
/// `script_content`) are refreshed by amendments. Everything else is
/// breakdown data owned by the team and is never touched by the merger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    pub scene_number: SceneNumber,
    #[serde(default)]
    pub slugline: String,
    #[serde(default)]
    pub int_ext: String,
    #[serde(default)]
    pub time_of_day: String,
    #[serde(default)]
    pub script_content: Option<String>,

    // -- Breakdown --
    /// Confirmed character ids.
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub character_confirmation_status: CharacterConfirmationStatus,
    #[serde(default)]
    pub suggested_characters: Vec<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub shooting_day: Option<DayNumber>,
    #[serde(default)]
    pub filming_status: Option<FilmingStatus>,
    #[serde(default)]
    pub filming_notes: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,

    // -- Amendment bookkeeping --
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amendment_status: Option<SceneChangeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amendment_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amendment_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_script_content: Option<String>,
}

impl Scene {
    /// An empty, unconfirmed scene with a fresh id.
    pub fn new(scene_number: impl Into<SceneNumber>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            scene_number: scene_number.into(),
            slugline: String::new(),
            int_ext: String::new(),
            time_of_day: String::new(),
            script_content: None,
            characters: Vec::new(),
            character_confirmation_status: CharacterConfirmationStatus::Pending,
            suggested_characters: Vec::new(),
            synopsis: None,
            shooting_day: None,
            filming_status: None,
            filming_notes: None,
            is_complete: false,
            completed_at: None,
            amendment_status: None,
            amendment_date: None,
            amendment_notes: None,
            previous_script_content: None,
        }
    }

    /// A fresh breakdown record for a scene that only exists in the parse.
    pub fn from_parsed(parsed: &ParsedScene) -> Self {
        let mut scene = Self::new(parsed.scene_number.clone());
        scene.apply_script_fields(parsed);
        scene
    }

    /// Script text, with an absent value read as empty.
    pub fn content(&self) -> &str {
        self.script_content.as_deref().unwrap_or("")
    }

    /// Overwrite the script-derived fields from a parse, leaving breakdown
    /// data alone.
    pub fn apply_script_fields(&mut self, parsed: &ParsedScene) {
        self.slugline = parsed.slugline.clone();
        self.int_ext = parsed.int_ext.clone();
        self.time_of_day = parsed.time_of_day.clone();
        self.script_content = parsed.script_content.clone();
    }
}

// ---------------------------------------------------------------------------
// ParsedScene
// ---------------------------------------------------------------------------

/// A scene as extracted from a revised script, before merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedScene {
    pub scene_number: SceneNumber,
    #[serde(default)]
    pub slugline: String,
    #[serde(default)]
    pub int_ext: String,
    #[serde(default)]
    pub time_of_day: String,
    #[serde(default)]
    pub script_content: Option<String>,
}

impl ParsedScene {
    pub fn content(&self) -> &str {
        self.script_content.as_deref().unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
