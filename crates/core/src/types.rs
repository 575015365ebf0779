/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date with no time-of-day, always interpreted in UTC.
pub type Day = chrono::NaiveDate;

/// Point balances, prices, and rewards.
pub type Points = i64;
