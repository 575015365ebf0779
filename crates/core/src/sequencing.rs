//! Task unlock sequencing within a language partition.
//!
//! Only completions are persisted. Whether an uncompleted task is locked or
//! available is derived here from the completions of the tasks before it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Per-user status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Locked,
    Available,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Available => "available",
            Self::Completed => "completed",
        }
    }
}

/// A task's place in its partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceEntry {
    pub task_id: DbId,
    pub position: i32,
}

/// Compute the status of every entry of one partition.
///
/// Entries may arrive in any order; the result is index-aligned with the
/// input. The walk orders by `(position, task_id)` and groups tasks that
/// share a position:
///
/// - a completed task is `Completed`;
/// - position 0 and the lowest remaining position of the partition are always
///   `Available`, so deleting the head never locks the sequence;
/// - otherwise a task is `Available` iff every task at the nearest lower
///   position is completed. Tasks at the same position never gate each
///   other, and a deleted position is simply skipped over.
pub fn sequence_statuses(entries: &[SequenceEntry], completed: &HashSet<DbId>) -> Vec<TaskStatus> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by_key(|&i| (entries[i].position, entries[i].task_id));

    let mut statuses = vec![TaskStatus::Locked; entries.len()];
    // `None` until the walk leaves the lowest position.
    let mut lower_group_completed: Option<bool> = None;
    let mut current_group: Option<(i32, bool)> = None;

    for i in order {
        let entry = entries[i];
        let is_completed = completed.contains(&entry.task_id);

        match current_group {
            Some((position, all_done)) if position == entry.position => {
                current_group = Some((position, all_done && is_completed));
            }
            Some((_, all_done)) => {
                lower_group_completed = Some(all_done);
                current_group = Some((entry.position, is_completed));
            }
            None => current_group = Some((entry.position, is_completed)),
        }

        statuses[i] = if is_completed {
            TaskStatus::Completed
        } else if entry.position == 0 || lower_group_completed.unwrap_or(true) {
            TaskStatus::Available
        } else {
            TaskStatus::Locked
        };
    }

    statuses
}

/// Status of a single task within its partition, or `None` if the task is not
/// part of `entries`.
pub fn status_in_sequence(
    entries: &[SequenceEntry],
    completed: &HashSet<DbId>,
    task_id: DbId,
) -> Option<TaskStatus> {
    let idx = entries.iter().position(|e| e.task_id == task_id)?;
    sequence_statuses(entries, completed).get(idx).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(rows: &[(DbId, i32)]) -> Vec<SequenceEntry> {
        rows.iter()
            .map(|&(task_id, position)| SequenceEntry { task_id, position })
            .collect()
    }

    fn done(ids: &[DbId]) -> HashSet<DbId> {
        ids.iter().copied().collect()
    }

    use TaskStatus::{Available, Completed, Locked};

    #[test]
    fn fresh_user_sees_only_head_available() {
        let e = entries(&[(1, 0), (2, 1), (3, 2)]);
        assert_eq!(sequence_statuses(&e, &done(&[])), vec![Available, Locked, Locked]);
    }

    #[test]
    fn completing_head_unlocks_next() {
        let e = entries(&[(1, 0), (2, 1), (3, 2)]);
        assert_eq!(
            sequence_statuses(&e, &done(&[1])),
            vec![Completed, Available, Locked]
        );
    }

    #[test]
    fn result_is_aligned_with_unsorted_input() {
        let e = entries(&[(3, 2), (1, 0), (2, 1)]);
        assert_eq!(
            sequence_statuses(&e, &done(&[1])),
            vec![Locked, Completed, Available]
        );
    }

    #[test]
    fn deleted_predecessor_falls_back_to_nearest_lower_task() {
        // Position 1 was deleted: position 2 depends on position 0.
        let e = entries(&[(1, 0), (3, 2), (4, 3)]);
        assert_eq!(
            sequence_statuses(&e, &done(&[1])),
            vec![Completed, Available, Locked]
        );
    }

    #[test]
    fn deleted_head_never_locks_the_partition() {
        // Position 0 was deleted: the lowest remaining task is the head.
        let e = entries(&[(2, 1), (3, 2)]);
        assert_eq!(sequence_statuses(&e, &done(&[])), vec![Available, Locked]);
    }

    #[test]
    fn position_zero_is_always_available() {
        let e = entries(&[(9, -1), (1, 0)]);
        assert_eq!(sequence_statuses(&e, &done(&[])), vec![Available, Available]);
    }

    #[test]
    fn out_of_order_completion_stays_completed() {
        // A completion recorded after a task was inserted ahead of it.
        let e = entries(&[(1, 0), (5, 1), (2, 2)]);
        assert_eq!(
            sequence_statuses(&e, &done(&[1, 2])),
            vec![Completed, Available, Completed]
        );
    }

    #[test]
    fn completed_never_reverts() {
        let e = entries(&[(1, 0), (2, 1), (3, 2)]);
        let mut completed = done(&[]);
        let mut seen_completed: HashSet<DbId> = HashSet::new();
        for id in [1, 2, 3] {
            completed.insert(id);
            let statuses = sequence_statuses(&e, &completed);
            for (entry, status) in e.iter().zip(&statuses) {
                if seen_completed.contains(&entry.task_id) {
                    assert_eq!(*status, Completed);
                }
            }
            seen_completed.insert(id);
        }
    }

    #[test]
    fn tasks_sharing_a_position_unlock_together() {
        let e = entries(&[(1, 0), (2, 1), (3, 1), (4, 2)]);
        assert_eq!(
            sequence_statuses(&e, &done(&[1])),
            vec![Completed, Available, Available, Locked]
        );
    }

    #[test]
    fn next_position_waits_for_the_whole_group() {
        let e = entries(&[(1, 0), (2, 1), (3, 1), (4, 2)]);
        assert_eq!(
            sequence_statuses(&e, &done(&[1, 3])),
            vec![Completed, Available, Completed, Locked]
        );
        assert_eq!(
            sequence_statuses(&e, &done(&[1, 2, 3])),
            vec![Completed, Completed, Completed, Available]
        );
    }

    #[test]
    fn shared_head_position_is_all_available() {
        let e = entries(&[(5, 3), (6, 3), (7, 4)]);
        assert_eq!(
            sequence_statuses(&e, &done(&[])),
            vec![Available, Available, Locked]
        );
    }

    #[test]
    fn single_task_lookup() {
        let e = entries(&[(1, 0), (2, 1)]);
        assert_eq!(status_in_sequence(&e, &done(&[]), 2), Some(Locked));
        assert_eq!(status_in_sequence(&e, &done(&[1]), 2), Some(Available));
        assert_eq!(status_in_sequence(&e, &done(&[]), 42), None);
    }

    #[test]
    fn status_strings() {
        assert_eq!(Locked.as_str(), "locked");
        assert_eq!(Available.as_str(), "available");
        assert_eq!(Completed.as_str(), "completed");
    }
}
