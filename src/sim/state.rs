//! Game state and core simulation types
//!
//! `GameState` is the single context object the shell owns. Everything the
//! game loop mutates lives here; nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::GameClock;
use super::grid::GridLayout;
use super::queue::CommandQueue;
use super::selection::Selection;
use super::store::BubbleStore;
use super::tick::Command;
use crate::settings::Settings;

/// Stable bubble handle. Never reused within a session.
pub type BubbleId = u32;

/// A logical slot in the layout grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
}

impl GridCell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// A numbered bubble (pure data, no view handle)
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub id: BubbleId,
    pub value: u32,
    /// Logical cell; `None` for bubbles placed by screen position only
    pub cell: Option<GridCell>,
    /// Center in play-area pixels
    pub pos: Vec2,
    pub radius: f32,
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Nothing started yet, start overlay visible
    Ready,
    /// Clock running, gestures accepted
    Playing,
    /// Time ran out; waiting for a retry
    GameOver,
}

/// Complete game state (deterministic for a given seed and command stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub settings: Settings,
    /// Grid over the current play area
    pub layout: GridLayout,
    /// Live bubbles
    pub bubbles: BubbleStore,
    /// Bubbles picked by the current gesture
    pub selection: Selection,
    /// Sum the player has to hit
    pub target: u32,
    pub score: u64,
    /// Successful matches this round
    pub level: u32,
    pub clock: GameClock,
    pub phase: GamePhase,
    /// A gesture is in progress
    pub dragging: bool,
    /// Last pointer position of the current gesture
    pub cursor: Option<Vec2>,
    /// Bubbles showing the failure shake
    pub fail_marks: Vec<BubbleId>,
    /// Pending commands (input, clock, delayed follow-ups)
    pub queue: CommandQueue<Command>,
}

impl GameState {
    /// Create an idle session with the given seed. The play area is empty
    /// until the first `Command::Resize`.
    pub fn new(seed: u64, settings: Settings) -> Self {
        let settings = settings.sanitized();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            layout: GridLayout::new(0.0, 0.0, settings.cell_size),
            settings,
            bubbles: BubbleStore::new(),
            selection: Selection::new(),
            target: 0,
            score: 0,
            level: 0,
            clock: GameClock::new(),
            phase: GamePhase::Ready,
            dragging: false,
            cursor: None,
            fail_marks: Vec::new(),
            queue: CommandQueue::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing && self.clock.running
    }

    /// Queue a command for the next `run_pending`
    pub fn post(&mut self, command: Command) {
        self.queue.push(command);
    }
}
