//! High score leaderboard
//!
//! Top 5 scores, highest first, persisted as a JSON array through a
//! [`ScoreStore`]. Missing or malformed data reads as an empty board.

use crate::persistence::ScoreStore;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// Storage key for the score list
pub const STORAGE_KEY: &str = "cannon_rush_leaderboard";

/// Parse a stored list, tolerating garbage
pub fn parse_scores(raw: &str) -> Vec<u64> {
    match serde_json::from_str::<Vec<u64>>(raw) {
        Ok(mut scores) => {
            scores.sort_unstable_by(|a, b| b.cmp(a));
            scores.truncate(MAX_HIGH_SCORES);
            scores
        }
        Err(e) => {
            log::warn!("Ignoring malformed leaderboard data: {}", e);
            Vec::new()
        }
    }
}

/// Insert a score keeping the list sorted descending and capped
pub fn insert_score(scores: &mut Vec<u64>, score: u64) {
    let pos = scores.iter().position(|&s| score > s).unwrap_or(scores.len());
    scores.insert(pos, score);
    scores.truncate(MAX_HIGH_SCORES);
}

/// High score leaderboard backed by a store
#[derive(Debug)]
pub struct Leaderboard<S: ScoreStore> {
    store: S,
}

impl<S: ScoreStore> Leaderboard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current top scores, highest first
    pub fn top_scores(&self) -> Vec<u64> {
        let scores = self
            .store
            .load(STORAGE_KEY)
            .map(|raw| parse_scores(&raw))
            .unwrap_or_default();
        log::debug!("Loaded {} high scores", scores.len());
        scores
    }

    /// Record a final score and return the updated top list
    pub fn record_score(&mut self, score: u64) -> Vec<u64> {
        let mut scores = self.top_scores();
        insert_score(&mut scores, score);
        match serde_json::to_string(&scores) {
            Ok(json) => {
                self.store.save(STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", scores.len());
            }
            Err(e) => log::warn!("Failed to encode high scores: {}", e),
        }
        scores
    }

    /// Top score, if any
    pub fn best(&self) -> Option<u64> {
        self.top_scores().first().copied()
    }

    /// 1-based rank a score would take, if it makes the board
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        let scores = self.top_scores();
        let rank = scores.iter().position(|&s| score > s).unwrap_or(scores.len());
        (rank < MAX_HIGH_SCORES).then_some(rank + 1)
    }
}
