//! Task kinds and answer grading.

use serde::{Deserialize, Serialize};

/// Task type value for scored single-answer quizzes.
pub const TASK_TYPE_QUIZ: &str = "quiz";
/// Task type value for open-ended feedback collection.
pub const TASK_TYPE_SURVEY: &str = "survey";

/// How a task's answers are graded.
///
/// Unknown type strings grade like a quiz (exact match), so a task can never
/// become free points just because its type was mistyped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Quiz,
    Survey,
}

impl TaskKind {
    /// Parse the `tasks.task_type` column.
    pub fn from_type(task_type: &str) -> Self {
        match task_type {
            TASK_TYPE_SURVEY => Self::Survey,
            _ => Self::Quiz,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quiz => TASK_TYPE_QUIZ,
            Self::Survey => TASK_TYPE_SURVEY,
        }
    }
}

/// Grade an answer.
///
/// Surveys accept any answer. Everything else is exact string equality with
/// the stored correct answer (no trimming, case-sensitive).
pub fn grade(kind: TaskKind, correct_answer: &str, answer: &str) -> bool {
    match kind {
        TaskKind::Survey => true,
        TaskKind::Quiz => answer == correct_answer,
    }
}

/// Pick the answer to grade from a submission.
///
/// A non-empty textual answer wins. Otherwise a valid `answer_index` selects
/// the matching option; an out-of-range or negative index yields an empty
/// answer, which a quiz will grade as wrong.
pub fn resolve_answer(answer: Option<&str>, answer_index: Option<i64>, options: &[String]) -> String {
    match answer {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => answer_index
            .and_then(|idx| usize::try_from(idx).ok())
            .and_then(|idx| options.get(idx))
            .cloned()
            .unwrap_or_default(),
    }
}
