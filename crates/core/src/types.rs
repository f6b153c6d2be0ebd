/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Skill levels start at 1.
pub type Level = i32;

/// Experience points. Signed so that reversal deltas can be expressed directly.
pub type Xp = i64;
