//! HUD text derived from game events
//!
//! Kept free of DOM types so the mapping is testable natively; `dom::Hud`
//! applies the updates to the page.

use crate::leaderboard::{LeaderboardError, RankRow, ScoreRecord, rank_rows};
use crate::sim::GameEvent;

pub const GAME_OVER_TITLE: &str = "TIME UP!";
pub const RETRY_LABEL: &str = "RETRY";

pub const RANKING_LOADING: &str = "Loading...";
pub const RANKING_EMPTY: &str = "No scores yet";
pub const RANKING_ERROR: &str = "Failed to load rankings";

/// Text slots on the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudField {
    Target,
    Score,
    Level,
    Timer,
    /// Equation of the current selection
    CurrentSum,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HudUpdate {
    Text(HudField, String),
    /// Show or hide the selection equation panel
    SelectionVisible(bool),
    HideOverlay,
    ShowOverlay {
        title: String,
        message: String,
        button: String,
    },
}

pub fn game_over_message(score: u64, level: u32) -> String {
    format!("SCORE: {}  (Level {})", score, level)
}

/// HUD changes caused by one event
pub fn hud_updates(event: &GameEvent) -> Vec<HudUpdate> {
    match event {
        GameEvent::GameStarted { time_left, .. } => vec![
            HudUpdate::HideOverlay,
            HudUpdate::Text(HudField::Timer, time_left.to_string()),
        ],
        GameEvent::TargetChanged(target) => {
            vec![HudUpdate::Text(HudField::Target, target.to_string())]
        }
        GameEvent::ScoreChanged { score, level } => vec![
            HudUpdate::Text(HudField::Score, score.to_string()),
            HudUpdate::Text(HudField::Level, level.to_string()),
        ],
        GameEvent::TimeChanged(left) => vec![HudUpdate::Text(HudField::Timer, left.to_string())],
        GameEvent::SelectionChanged { ids, equation, .. } => vec![
            HudUpdate::SelectionVisible(!ids.is_empty()),
            HudUpdate::Text(HudField::CurrentSum, equation.clone()),
        ],
        GameEvent::GameOver { score, level } => vec![HudUpdate::ShowOverlay {
            title: GAME_OVER_TITLE.to_string(),
            message: game_over_message(*score, *level),
            button: RETRY_LABEL.to_string(),
        }],
        _ => Vec::new(),
    }
}

/// What the rankings list should show
#[derive(Debug, Clone, PartialEq)]
pub enum RankingView {
    Loading,
    Empty,
    Failed,
    Rows(Vec<RankRow>),
}

impl RankingView {
    /// Placeholder line for non-row states
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(RANKING_LOADING),
            Self::Empty => Some(RANKING_EMPTY),
            Self::Failed => Some(RANKING_ERROR),
            Self::Rows(_) => None,
        }
    }
}

/// View for a finished fetch (records highest first)
pub fn ranking_view(
    result: &Result<Vec<ScoreRecord>, LeaderboardError>,
    now_ms: f64,
) -> RankingView {
    match result {
        Ok(records) if records.is_empty() => RankingView::Empty,
        Ok(records) => RankingView::Rows(rank_rows(records, now_ms)),
        Err(e) => {
            log::error!("Error fetching leaderboard: {}", e);
            RankingView::Failed
        }
    }
}
