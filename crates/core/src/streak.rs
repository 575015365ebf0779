//! Daily streak tracking.
//!
//! A streak counts consecutive UTC calendar days on which the user completed
//! at least one task. The counter and the last completion date always move
//! together.

use crate::types::{Day, Timestamp};

/// New streak state to persist after a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: i32,
    pub last_date: Day,
}

/// UTC calendar day of a timestamp.
pub fn utc_day(now: Timestamp) -> Day {
    now.date_naive()
}

/// Compute the streak after a completion on `today`.
///
/// | last completion     | result                  |
/// |---------------------|-------------------------|
/// | never               | `(1, today)`            |
/// | today               | unchanged               |
/// | yesterday           | `(current + 1, today)`  |
/// | two or more days ago| `(1, today)`            |
/// | after today         | unchanged (clock skew)  |
pub fn next_streak(last_date: Option<Day>, today: Day, current: i32) -> StreakUpdate {
    let Some(last) = last_date else {
        return StreakUpdate {
            streak: 1,
            last_date: today,
        };
    };

    match (today - last).num_days() {
        1 => StreakUpdate {
            streak: current.saturating_add(1),
            last_date: today,
        },
        days if days > 1 => StreakUpdate {
            streak: 1,
            last_date: today,
        },
        _ => StreakUpdate {
            streak: current,
            last_date: last,
        },
    }
}
