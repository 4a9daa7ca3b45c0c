//! Shooting schedule records as produced by the schedule parser.

use serde::{Deserialize, Serialize};

use crate::scene_number::ScheduleSceneKey;
use crate::types::{CastNumber, DayNumber, ScheduleId, Timestamp};

/// Processing state of an uploaded schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    #[default]
    Pending,
    Processing,
    Complete,
    Partial,
}

/// One actor on the schedule's cast list. `number` is the durable identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCastMember {
    pub number: CastNumber,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

/// A scene slot on a shoot day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSceneEntry {
    pub scene_number: String,
    #[serde(default)]
    pub set_location: Option<String>,
    #[serde(default)]
    pub int_ext: Option<String>,
    #[serde(default)]
    pub day_night: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pages: Option<String>,
    #[serde(default)]
    pub cast_numbers: Vec<CastNumber>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub shoot_order: Option<u32>,
}

impl ScheduleSceneEntry {
    pub fn new(scene_number: impl Into<String>) -> Self {
        Self {
            scene_number: scene_number.into(),
            set_location: None,
            int_ext: None,
            day_night: None,
            description: None,
            pages: None,
            cast_numbers: Vec::new(),
            estimated_time: None,
            shoot_order: None,
        }
    }

    /// Cross-revision match key for this entry.
    pub fn key(&self) -> ScheduleSceneKey {
        ScheduleSceneKey::normalize(&self.scene_number)
    }
}

/// One day of principal photography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub day_number: DayNumber,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub scenes: Vec<ScheduleSceneEntry>,
}

impl ScheduleDay {
    pub fn new(day_number: DayNumber) -> Self {
        Self {
            day_number,
            date: None,
            location: None,
            notes: None,
            scenes: Vec::new(),
        }
    }

    /// The same day with no scenes, used when a scene has to be placed on a
    /// day the new schedule no longer has.
    pub fn empty_copy(&self) -> Self {
        Self {
            scenes: Vec::new(),
            ..self.clone()
        }
    }

    pub fn contains(&self, key: &ScheduleSceneKey) -> bool {
        self.scenes.iter().any(|entry| &entry.key() == key)
    }
}

/// A production-wide shooting schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSchedule {
    pub id: ScheduleId,
    #[serde(default)]
    pub production_name: Option<String>,
    #[serde(default)]
    pub schedule_version: Option<String>,
    #[serde(default)]
    pub status: ScheduleStatus,
    #[serde(default)]
    pub uploaded_at: Option<Timestamp>,
    #[serde(default)]
    pub cast_list: Vec<ScheduleCastMember>,
    #[serde(default)]
    pub days: Vec<ScheduleDay>,
}

impl ProductionSchedule {
    pub fn new(days: Vec<ScheduleDay>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            production_name: None,
            schedule_version: None,
            status: ScheduleStatus::default(),
            uploaded_at: None,
            cast_list: Vec::new(),
            days,
        }
    }

    pub fn day(&self, day_number: DayNumber) -> Option<&ScheduleDay> {
        self.days.iter().find(|d| d.day_number == day_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_key_is_normalized() {
        assert_eq!(ScheduleSceneEntry::new(" 5 a ").key().as_str(), "5A");
    }

    #[test]
    fn empty_copy_keeps_day_metadata() {
        let mut day = ScheduleDay::new(3);
        day.location = Some("Stage 4".to_string());
        day.scenes.push(ScheduleSceneEntry::new("1"));
        let copy = day.empty_copy();
        assert_eq!(copy.day_number, 3);
        assert_eq!(copy.location.as_deref(), Some("Stage 4"));
        assert!(copy.scenes.is_empty());
    }

    #[test]
    fn contains_matches_normalized_key() {
        let mut day = ScheduleDay::new(1);
        day.scenes.push(ScheduleSceneEntry::new("12a"));
        assert!(day.contains(&ScheduleSceneKey::normalize("12A")));
        assert!(!day.contains(&ScheduleSceneKey::normalize("12")));
    }

    #[test]
    fn deserializes_parser_output() {
        let json = serde_json::json!({
            "id": "0b7e3f7a-3b8e-4d43-9c55-1e2f0a6c9d10",
            "status": "complete",
            "castList": [{ "number": 1, "name": "JANE" }],
            "days": [{
                "dayNumber": 1,
                "scenes": [{ "sceneNumber": "5A", "castNumbers": [1, 2], "estimatedTime": "09:00" }]
            }]
        });
        let schedule: ProductionSchedule = serde_json::from_value(json).unwrap();
        assert_eq!(schedule.status, ScheduleStatus::Complete);
        assert_eq!(schedule.cast_list[0].number, 1);
        let entry = &schedule.day(1).unwrap().scenes[0];
        assert_eq!(entry.cast_numbers, vec![1, 2]);
        assert_eq!(entry.estimated_time.as_deref(), Some("09:00"));
        assert!(entry.shoot_order.is_none());
    }
}
