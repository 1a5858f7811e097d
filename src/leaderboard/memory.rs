//! In-process leaderboard for the native build and tests

use std::cell::{Cell, RefCell};

use super::{Leaderboard, LeaderboardError, ScoreRecord};

/// Store that lives as long as the process. Stamps records with its own
/// clock, like a server would.
#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    records: RefCell<Vec<ScoreRecord>>,
    now_ms: Cell<f64>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time stamped on the next pushes
    pub fn set_now(&self, now_ms: f64) {
        self.now_ms.set(now_ms);
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl Leaderboard for MemoryLeaderboard {
    async fn push(&self, name: &str, score: u64) -> Result<(), LeaderboardError> {
        self.records.borrow_mut().push(ScoreRecord {
            name: name.to_string(),
            score,
            timestamp: self.now_ms.get(),
        });
        Ok(())
    }

    async fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, LeaderboardError> {
        let mut sorted = self.records.borrow().clone();
        // Stable: equal scores keep insertion order
        sorted.sort_by_key(|r| r.score);
        let skip = sorted.len().saturating_sub(limit);
        Ok(sorted.split_off(skip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_is_ascending_and_limited() {
        let board = MemoryLeaderboard::new();
        for (name, score) in [("a", 5), ("b", 1), ("c", 9), ("d", 3)] {
            pollster::block_on(board.push(name, score)).unwrap();
        }
        let top = pollster::block_on(board.top(3)).unwrap();
        let scores: Vec<u64> = top.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![3, 5, 9]);
    }

    #[test]
    fn test_push_stamps_store_time() {
        let board = MemoryLeaderboard::new();
        board.set_now(1234.0);
        pollster::block_on(board.push("ann", 10)).unwrap();
        let top = pollster::block_on(board.top(10)).unwrap();
        assert_eq!(top[0].timestamp, 1234.0);
        assert_eq!(board.len(), 1);
    }
}
