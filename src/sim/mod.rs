//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time only through `CommandQueue::advance_to`
//! - Commands applied strictly in posting order
//! - No DOM or platform dependencies

pub mod clock;
pub mod grid;
pub mod queue;
pub mod selection;
pub mod state;
pub mod store;
pub mod target;
pub mod tick;

pub use clock::{ClockTick, GameClock};
pub use grid::{GridLayout, allocate_cells};
pub use queue::CommandQueue;
pub use selection::Selection;
pub use state::{Bubble, BubbleId, GamePhase, GameState, GridCell};
pub use store::BubbleStore;
pub use target::generate_target;
pub use tick::{Command, FailReason, GameEvent, apply, run_pending};

use thiserror::Error;

/// Level setup failures. Logged by the caller; never fatal.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("play area {width}x{height} fits no {cell_size}px cell")]
    PlayAreaTooSmall {
        width: f32,
        height: f32,
        cell_size: f32,
    },
}
