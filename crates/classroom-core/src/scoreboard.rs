//! Persisted leaderboard of finished quiz sessions.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use crate::model::QuizResult;
use crate::store::{load_or_empty, JsonFileStore, RecordStore, SaveOutcome};

/// A leaderboard entry with its 1-based rank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranked<'a> {
    pub rank: usize,
    #[serde(flatten)]
    pub result: &'a QuizResult,
}

/// Outcome of recording a finished session.
#[derive(Debug)]
pub struct Recorded {
    /// Rank the new result landed at.
    pub rank: usize,
    pub save: SaveOutcome,
}

/// Score history kept sorted by score, highest first.
///
/// Ties keep insertion order.
pub struct ScoreBoard {
    history: Vec<QuizResult>,
    store: Box<dyn RecordStore<QuizResult>>,
}

impl ScoreBoard {
    /// Load the persisted history. Missing or unreadable data yields an empty board.
    pub fn load(store: Box<dyn RecordStore<QuizResult>>) -> Self {
        let mut history = load_or_empty(store.as_ref(), "quiz scores");
        sort_by_score(&mut history);
        Self { history, store }
    }

    /// Load the board from a JSON snapshot file.
    pub fn open(path: &Path) -> Self {
        Self::load(Box::new(JsonFileStore::<QuizResult>::new(path)))
    }

    /// Append `result`, re-rank, and persist the whole history.
    ///
    /// The in-memory board is updated even when the save fails.
    pub fn record(&mut self, result: QuizResult) -> Recorded {
        let score = result.score;
        let player = result.player.clone();
        self.history.push(result);
        sort_by_score(&mut self.history);
        // The sort is stable, so the new entry sits after every equal score.
        let rank = self.history.iter().filter(|r| r.score >= score).count();

        let save = SaveOutcome::from_result(self.store.save(&self.history), "quiz scores");
        tracing::info!("recorded score {score} for {player} at rank {rank}");
        Recorded { rank, save }
    }

    /// The history in rank order.
    pub fn ranked(&self) -> impl Iterator<Item = Ranked<'_>> {
        self.history
            .iter()
            .enumerate()
            .map(|(i, result)| Ranked { rank: i + 1, result })
    }

    /// The `n` best results.
    pub fn top(&self, n: usize) -> Vec<Ranked<'_>> {
        self.ranked().take(n).collect()
    }

    pub fn history(&self) -> &[QuizResult] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Render the leaderboard as a markdown table.
    pub fn to_markdown(&self, limit: Option<usize>) -> String {
        let mut md = String::new();
        md.push_str("| Rank | Player | Score | Questions | Accuracy % | Date |\n");
        md.push_str("|------|--------|-------|-----------|------------|------|\n");
        for entry in self.ranked().take(limit.unwrap_or(usize::MAX)) {
            let r = entry.result;
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {:.1}% | {} |",
                entry.rank,
                r.player,
                r.score,
                r.total_questions,
                r.accuracy,
                r.display_date()
            );
        }
        md
    }
}

impl std::fmt::Debug for ScoreBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreBoard")
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

fn sort_by_score(history: &mut [QuizResult]) {
    history.sort_by(|a, b| b.score.cmp(&a.score));
}
