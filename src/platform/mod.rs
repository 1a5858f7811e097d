//! Platform layer
//!
//! Handles browser/native differences for:
//! - Input events (normalized to play-area coordinates)
//! - HUD and overlay text
//! - DOM view of the bubbles (web only)
//! - Rankings modal (web only)

pub mod hud;
pub mod input;

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod ranking;

pub use hud::{HudField, HudUpdate, RankingView, hud_updates, ranking_view};
pub use input::{PointerPhase, play_area_pos, pointer_command};
