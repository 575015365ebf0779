//! Leaderboard ordering.
//!
//! Both the top list and a single user's rank use the same total order:
//! balance descending, then completed-task count descending, then user id
//! ascending. Any two distinct users therefore compare unequal, and a user's
//! rank is always `1 + number of users ahead of them`.

use std::cmp::Ordering;

use crate::types::{DbId, Points};

/// Number of entries in the leaderboard's top list.
pub const LEADERBOARD_TOP_LIMIT: usize = 20;

/// The fields a user is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingKey {
    pub user_id: DbId,
    pub balance: Points,
    pub completed_tasks: i64,
}

impl RankingKey {
    /// Whether `self` is strictly ahead of `other` in the leaderboard.
    pub fn outranks(&self, other: &RankingKey) -> bool {
        self.cmp(other) == Ordering::Less
    }
}

impl Ord for RankingKey {
    /// `Less` means "ranked higher".
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .balance
            .cmp(&self.balance)
            .then_with(|| other.completed_tasks.cmp(&self.completed_tasks))
            .then_with(|| self.user_id.cmp(&other.user_id))
    }
}

impl PartialOrd for RankingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rank of `target` among `population`: one plus the number of keys that
/// outrank it. `target` may or may not be part of `population`.
pub fn rank_of<'a, I>(target: &RankingKey, population: I) -> i64
where
    I: IntoIterator<Item = &'a RankingKey>,
{
    1 + population
        .into_iter()
        .filter(|key| key.outranks(target))
        .count() as i64
}
