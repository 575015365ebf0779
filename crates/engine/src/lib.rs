//! Progression and economy engine.
//!
//! Each component holds the [`LedgerStore`] handle it was constructed with
//! and nothing else; there is no global store. [`Engine`] bundles one of each
//! over a shared handle.

use std::sync::Arc;

use questline_db::LedgerStore;

pub mod economy;
pub mod leaderboard;
pub mod sequencer;
pub mod submission;

pub use economy::EconomyEngine;
pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardRanker};
pub use sequencer::{OpenedTask, SequencedTask, TaskSequencer};
pub use submission::{Submission, SubmissionEvaluator};

/// All engine components over one store.
#[derive(Clone)]
pub struct Engine {
    pub sequencer: TaskSequencer,
    pub evaluator: SubmissionEvaluator,
    pub economy: EconomyEngine,
    pub ranker: LeaderboardRanker,
}

impl Engine {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            sequencer: TaskSequencer::new(Arc::clone(&store)),
            evaluator: SubmissionEvaluator::new(Arc::clone(&store)),
            economy: EconomyEngine::new(Arc::clone(&store)),
            ranker: LeaderboardRanker::new(store),
        }
    }
}
