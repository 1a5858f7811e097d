//! Online leaderboard
//!
//! Append-only score records in an external store. The store answers a top-N
//! query in ascending score order; callers reverse it for display.

pub mod firebase;
pub mod memory;

use chrono::{DateTime, Datelike, Local, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::LEADERBOARD_SIZE;

pub use firebase::parse_scores_snapshot;
pub use memory::MemoryLeaderboard;

#[cfg(target_arch = "wasm32")]
pub use firebase::FirebaseLeaderboard;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u64,
    /// Server-assigned Unix timestamp (ms)
    #[serde(default)]
    pub timestamp: f64,
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("player name is empty")]
    EmptyName,
    #[error("score of zero is not submitted")]
    ZeroScore,
    #[error("no leaderboard database configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed leaderboard data: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LeaderboardError {
    /// Short message for the player
    pub fn notice(&self) -> &'static str {
        match self {
            Self::EmptyName => "Enter a name first.",
            Self::ZeroScore => "Nothing to save yet.",
            Self::NotConfigured => "Rankings are offline.",
            Self::Transport(_) | Self::Status(_) | Self::Decode(_) => {
                "Could not reach the rankings. Try again later."
            }
        }
    }

    /// Rejected locally, never sent
    pub fn is_invalid_submission(&self) -> bool {
        matches!(self, Self::EmptyName | Self::ZeroScore)
    }
}

/// Remote score store
#[allow(async_fn_in_trait)]
pub trait Leaderboard {
    /// Append a record; the store stamps the time
    async fn push(&self, name: &str, score: u64) -> Result<(), LeaderboardError>;

    /// Highest `limit` records, lowest score first
    async fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, LeaderboardError>;
}

/// Check a submission before it goes over the wire. Returns the trimmed name.
pub fn validate_submission(name: &str, score: u64) -> Result<&str, LeaderboardError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LeaderboardError::EmptyName);
    }
    if score == 0 {
        return Err(LeaderboardError::ZeroScore);
    }
    Ok(name)
}

/// Current top records, highest score first
pub async fn fetch_rankings<L: Leaderboard>(
    board: &L,
) -> Result<Vec<ScoreRecord>, LeaderboardError> {
    log::info!("Fetching leaderboard...");
    let mut records = board.top(LEADERBOARD_SIZE).await?;
    records.reverse();
    Ok(records)
}

/// Save a score, then re-read the rankings
pub async fn submit_and_refresh<L: Leaderboard>(
    board: &L,
    name: &str,
    score: u64,
) -> Result<Vec<ScoreRecord>, LeaderboardError> {
    let name = validate_submission(name, score)?;
    board.push(name, score).await?;
    log::info!("Score saved: {} ({})", score, name);
    fetch_rankings(board).await
}

/// One display line of the rankings list
#[derive(Debug, Clone, PartialEq)]
pub struct RankRow {
    /// 1-based
    pub rank: usize,
    pub name: String,
    pub score: u64,
    pub when: String,
}

/// Number a descending record list for display
pub fn rank_rows(records: &[ScoreRecord], now_ms: f64) -> Vec<RankRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| RankRow {
            rank: i + 1,
            name: r.name.clone(),
            score: r.score,
            when: format_age(now_ms, r.timestamp),
        })
        .collect()
}

/// Format a timestamp relative to `now_ms`. Dates are shown in local time.
pub fn format_age(now_ms: f64, timestamp: f64) -> String {
    format_age_in(now_ms, timestamp, &Local)
}

/// `format_age` with an explicit time zone for the date form
pub fn format_age_in<Tz: TimeZone>(now_ms: f64, timestamp: f64, tz: &Tz) -> String {
    let diff_secs = (now_ms - timestamp).max(0.0) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            match DateTime::from_timestamp_millis(timestamp as i64) {
                Some(utc) => {
                    let date = utc.with_timezone(tz);
                    format!("{}/{}/{}", date.month(), date.day(), date.year() % 100)
                }
                None => "N/A".to_string(),
            }
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
