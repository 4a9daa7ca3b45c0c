/// Surrogate identity for a stored scene record. Never carried across
/// script revisions; see [`crate::scene_number::SceneNumber`].
pub type SceneId = uuid::Uuid;

/// Surrogate identity for a stored production schedule.
pub type ScheduleId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Cast member number on a shooting schedule (the "1" in "1. JOHN").
pub type CastNumber = u32;

/// Shoot day number on a shooting schedule.
pub type DayNumber = u32;
