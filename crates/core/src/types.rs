/// All database primary keys are UUIDs (opaque, generated at insert time).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
