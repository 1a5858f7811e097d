//! Command processing
//!
//! Every mutation of `GameState` goes through `apply`, one command at a time,
//! in the order commands were posted. Each command runs to completion before
//! the next one starts.

use glam::Vec2;

use super::clock::ClockTick;
use super::grid::GridLayout;
use super::state::{BubbleId, GamePhase, GameState};
use super::target::generate_target;
use crate::consts::*;

/// Inputs to the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start (or restart) a round
    StartGame,
    /// Gesture start at a play-area position
    PointerDown(Vec2),
    PointerMove(Vec2),
    /// Gesture end
    PointerUp,
    /// One second elapsed on the timer armed with `epoch`
    ClockTick { epoch: u32 },
    /// Play area changed size
    Resize { width: f32, height: f32 },
    /// Refill the board after a match in round `epoch`
    Replenish { epoch: u32 },
    /// Drop the failure shake
    ClearFailMarks,
}

/// Why a release did not score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    /// Fewer than two bubbles picked
    TooFew,
    /// Sum didn't equal the target
    WrongSum,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A round began; the shell must (re)start its timer with `epoch`
    GameStarted { epoch: u32, time_left: i32 },
    BubbleSpawned { id: BubbleId, value: u32, pos: Vec2 },
    /// Matched bubble left the store; the view keeps it for the pop animation
    BubblePopped { id: BubbleId, remove_after_ms: f64 },
    /// Level reset dropped every bubble
    BubblesCleared,
    TargetChanged(u32),
    ScoreChanged { score: u64, level: u32 },
    TimeChanged(i32),
    SelectionChanged {
        ids: Vec<BubbleId>,
        sum: u32,
        equation: String,
    },
    MatchSucceeded { sum: u32, gained: u64 },
    MatchFailed { ids: Vec<BubbleId>, reason: FailReason },
    FailMarksCleared,
    /// Time ran out; the shell must stop its timer
    GameOver { score: u64, level: u32 },
}

/// Release due delayed commands and process everything queued
pub fn run_pending(state: &mut GameState, now_ms: f64) -> Vec<GameEvent> {
    state.queue.advance_to(now_ms);
    let mut events = Vec::new();
    while let Some(command) = state.queue.pop() {
        apply_into(state, command, &mut events);
    }
    events
}

/// Process a single command immediately
pub fn apply(state: &mut GameState, command: Command) -> Vec<GameEvent> {
    let mut events = Vec::new();
    apply_into(state, command, &mut events);
    events
}

fn apply_into(state: &mut GameState, command: Command, events: &mut Vec<GameEvent>) {
    match command {
        Command::StartGame => start_game(state, events),
        Command::PointerDown(pos) => pointer_down(state, pos, events),
        Command::PointerMove(pos) => pointer_move(state, pos, events),
        Command::PointerUp => pointer_up(state, events),
        Command::ClockTick { epoch } => clock_tick(state, epoch, events),
        Command::Resize { width, height } => {
            state.layout = GridLayout::new(width, height, state.settings.cell_size);
            log::debug!(
                "Play area {}x{} -> {}x{} cells",
                width,
                height,
                state.layout.cols,
                state.layout.rows
            );
        }
        Command::Replenish { epoch } => {
            if epoch == state.clock.epoch {
                replenish(state, events);
            }
        }
        Command::ClearFailMarks => {
            if !state.fail_marks.is_empty() {
                state.fail_marks.clear();
                events.push(GameEvent::FailMarksCleared);
            }
        }
    }
}

fn start_game(state: &mut GameState, events: &mut Vec<GameEvent>) {
    log::info!("Starting game...");

    // Arm the clock first so the round can always time out
    let epoch = state.clock.arm(state.settings.time_limit);
    state.phase = GamePhase::Playing;
    state.score = 0;
    state.level = 0;
    state.target = 0;
    state.dragging = false;
    state.cursor = None;
    state.selection.clear();
    state.fail_marks.clear();

    events.push(GameEvent::GameStarted {
        epoch,
        time_left: state.clock.time_left,
    });
    events.push(GameEvent::ScoreChanged {
        score: 0,
        level: 0,
    });
    events.push(selection_changed(state));

    if let Err(e) = next_level(state, events) {
        log::error!("Game logic error: {}", e);
    }
}

/// Fresh board and target
fn next_level(state: &mut GameState, events: &mut Vec<GameEvent>) -> Result<(), super::SimError> {
    if !state.bubbles.clear().is_empty() {
        events.push(GameEvent::BubblesCleared);
    }

    if state.layout.is_empty() {
        return Err(super::SimError::PlayAreaTooSmall {
            width: state.layout.width,
            height: state.layout.height,
            cell_size: state.layout.cell_size,
        });
    }

    let count = state.settings.bubble_count;
    spawn(state, count, events);
    new_target(state, events);
    Ok(())
}

fn spawn(state: &mut GameState, count: usize, events: &mut Vec<GameEvent>) {
    let values = state.settings.min_value..=state.settings.max_value;
    let ids = state
        .bubbles
        .spawn(&state.layout, count, values, &mut state.rng);
    for id in ids {
        if let Some(b) = state.bubbles.get(id) {
            events.push(GameEvent::BubbleSpawned {
                id,
                value: b.value,
                pos: b.pos,
            });
        }
    }
}

fn new_target(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.bubbles.len() < 2 {
        spawn(state, TARGET_TOP_UP, events);
    }
    state.target = generate_target(&state.bubbles, &mut state.rng);
    events.push(GameEvent::TargetChanged(state.target));
}

fn replenish(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let needed = state
        .settings
        .bubble_count
        .saturating_sub(state.bubbles.len());
    if needed > 0 {
        spawn(state, needed, events);
    }
    new_target(state, events);
}

fn selection_changed(state: &GameState) -> GameEvent {
    GameEvent::SelectionChanged {
        ids: state.selection.ids().to_vec(),
        sum: state.selection.sum(),
        equation: state.selection.equation(&state.bubbles),
    }
}

fn pointer_down(state: &mut GameState, pos: Vec2, events: &mut Vec<GameEvent>) {
    if !state.is_running() {
        return;
    }
    state.dragging = true;
    state.cursor = Some(pos);
    state.selection.clear();
    state
        .selection
        .hit_test(&state.bubbles, pos, state.settings.link_distance);
    events.push(selection_changed(state));
}

fn pointer_move(state: &mut GameState, pos: Vec2, events: &mut Vec<GameEvent>) {
    if !state.dragging {
        return;
    }
    state.cursor = Some(pos);
    if state
        .selection
        .hit_test(&state.bubbles, pos, state.settings.link_distance)
    {
        events.push(selection_changed(state));
    }
}

fn pointer_up(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if !state.dragging {
        return;
    }
    state.dragging = false;
    state.cursor = None;

    if state.selection.is_match(state.target) {
        succeed(state, events);
    } else {
        fail(state, events);
    }

    state.selection.clear();
    events.push(selection_changed(state));
}

fn succeed(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let sum = state.selection.sum();
    let gained = u64::from(sum) * SCORE_PER_POINT;
    state.score += gained;
    state.level += 1;
    log::debug!("Matched {} for {} points", sum, gained);

    events.push(GameEvent::MatchSucceeded { sum, gained });
    events.push(GameEvent::ScoreChanged {
        score: state.score,
        level: state.level,
    });

    for bubble in state.bubbles.remove(state.selection.ids()) {
        events.push(GameEvent::BubblePopped {
            id: bubble.id,
            remove_after_ms: POP_REMOVE_DELAY_MS,
        });
    }

    state.queue.push_after(
        REPLENISH_DELAY_MS,
        Command::Replenish {
            epoch: state.clock.epoch,
        },
    );
}

fn fail(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let reason = if state.selection.len() < 2 {
        FailReason::TooFew
    } else {
        FailReason::WrongSum
    };
    let ids = state.selection.ids().to_vec();
    if !ids.is_empty() {
        state.fail_marks.extend(ids.iter().copied());
        state.queue.push_after(FAIL_MARK_MS, Command::ClearFailMarks);
    }
    events.push(GameEvent::MatchFailed { ids, reason });
}

fn clock_tick(state: &mut GameState, epoch: u32, events: &mut Vec<GameEvent>) {
    match state.clock.tick(epoch) {
        ClockTick::Stale => {}
        ClockTick::Running(left) => events.push(GameEvent::TimeChanged(left)),
        ClockTick::Expired => {
            events.push(GameEvent::TimeChanged(state.clock.time_left));
            game_over(state, events);
        }
    }
}

fn game_over(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.clock.stop();
    state.phase = GamePhase::GameOver;
    // An unfinished gesture is dropped, not scored
    if state.dragging {
        state.dragging = false;
        state.cursor = None;
        state.selection.clear();
        events.push(selection_changed(state));
    }
    log::info!("Time up: score {} at level {}", state.score, state.level);
    events.push(GameEvent::GameOver {
        score: state.score,
        level: state.level,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::GridCell;

    /// Running game on a 500x500 area
    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Settings::default());
        apply(&mut state, Command::Resize { width: 500.0, height: 500.0 });
        apply(&mut state, Command::StartGame);
        state
    }

    /// Running game with hand-placed bubbles and a fixed target
    fn scripted(values: &[u32], target: u32) -> (GameState, Vec<BubbleId>) {
        let mut state = started(1);
        state.bubbles.clear();
        let ids = values
            .iter()
            .enumerate()
            .map(|(i, v)| state.bubbles.insert(*v, Vec2::new(40.0 + 60.0 * i as f32, 40.0)))
            .collect();
        state.target = target;
        (state, ids)
    }

    fn pos_of(state: &GameState, id: BubbleId) -> Vec2 {
        state.bubbles.get(id).unwrap().pos
    }

    fn drag(state: &mut GameState, ids: &[BubbleId]) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let first = pos_of(state, ids[0]);
        events.extend(apply(state, Command::PointerDown(first)));
        for id in &ids[1..] {
            let p = pos_of(state, *id);
            events.extend(apply(state, Command::PointerMove(p)));
        }
        events.extend(apply(state, Command::PointerUp));
        events
    }

    #[test]
    fn test_start_fills_board() {
        let state = started(5);
        assert!(state.is_running());
        assert_eq!(state.clock.time_left, TIME_LIMIT);
        // 8x8 grid has room for the full count
        assert_eq!(state.bubbles.len(), BUBBLE_COUNT);
        assert!(state.target > 0);
        assert_eq!((state.score, state.level), (0, 0));
    }

    #[test]
    fn test_no_shared_cells_after_start() {
        let state = started(77);
        let mut cells: Vec<GridCell> = state.bubbles.iter().map(|b| b.cell.unwrap()).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), state.bubbles.len());
    }

    #[test]
    fn test_match_scores_and_levels() {
        let (mut state, ids) = scripted(&[3, 4, 5], 7);
        let events = drag(&mut state, &ids[..2]);

        assert_eq!(state.score, 70);
        assert_eq!(state.level, 1);
        assert!(events.contains(&GameEvent::MatchSucceeded { sum: 7, gained: 70 }));
        assert!(state.bubbles.get(ids[0]).is_none());
        assert!(state.bubbles.get(ids[1]).is_none());
        assert!(state.bubbles.get(ids[2]).is_some());
        assert!(state.selection.is_empty());
        assert!(!state.dragging);

        let popped = events
            .iter()
            .filter(|e| matches!(e, GameEvent::BubblePopped { .. }))
            .count();
        assert_eq!(popped, 2);
    }

    #[test]
    fn test_refill_arrives_after_delay() {
        let (mut state, ids) = scripted(&[3, 4, 5], 7);
        drag(&mut state, &ids[..2]);
        assert_eq!(state.bubbles.len(), 1);

        let now = state.queue.now_ms();
        assert!(run_pending(&mut state, now + REPLENISH_DELAY_MS - 1.0).is_empty());

        let events = run_pending(&mut state, now + REPLENISH_DELAY_MS);
        assert_eq!(state.bubbles.len(), BUBBLE_COUNT);
        assert!(events.iter().any(|e| matches!(e, GameEvent::TargetChanged(t) if *t > 0)));
    }

    #[test]
    fn test_single_bubble_equal_to_target_fails() {
        let (mut state, ids) = scripted(&[7, 2], 7);
        let events = drag(&mut state, &ids[..1]);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 0);
        assert!(events.contains(&GameEvent::MatchFailed {
            ids: vec![ids[0]],
            reason: FailReason::TooFew,
        }));
        assert_eq!(state.bubbles.len(), 2);
    }

    #[test]
    fn test_wrong_sum_marks_then_clears() {
        let (mut state, ids) = scripted(&[3, 5], 7);
        let events = drag(&mut state, &ids);
        assert!(events.contains(&GameEvent::MatchFailed {
            ids: ids.clone(),
            reason: FailReason::WrongSum,
        }));
        assert_eq!(state.fail_marks, ids);

        let now = state.queue.now_ms();
        let events = run_pending(&mut state, now + FAIL_MARK_MS);
        assert_eq!(events, vec![GameEvent::FailMarksCleared]);
        assert!(state.fail_marks.is_empty());
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let (mut state, ids) = scripted(&[3, 4], 7);
        let p = pos_of(&state, ids[0]);
        assert!(apply(&mut state, Command::PointerMove(p)).is_empty());
        assert!(apply(&mut state, Command::PointerUp).is_empty());
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_game_over_exactly_once() {
        let mut state = started(3);
        let epoch = state.clock.epoch;
        let mut overs = 0;
        for _ in 0..TIME_LIMIT + 5 {
            state.post(Command::ClockTick { epoch });
            overs += run_pending(&mut state, 0.0)
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count();
        }
        assert_eq!(overs, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.is_running());
        assert_eq!(state.clock.time_left, 0);
    }

    #[test]
    fn test_gestures_ignored_after_game_over() {
        let (mut state, ids) = scripted(&[3, 4], 7);
        state.clock.time_left = 1;
        let epoch = state.clock.epoch;
        apply(&mut state, Command::ClockTick { epoch });
        assert_eq!(state.phase, GamePhase::GameOver);

        let events = drag(&mut state, &ids);
        assert!(events.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_time_up_drops_open_gesture() {
        let (mut state, ids) = scripted(&[3, 4], 7);
        let start = pos_of(&state, ids[0]);
        apply(&mut state, Command::PointerDown(start));
        state.clock.time_left = 1;
        let epoch = state.clock.epoch;
        apply(&mut state, Command::ClockTick { epoch });
        assert!(!state.dragging);
        assert!(apply(&mut state, Command::PointerUp).is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_restart_cancels_old_clock_and_refill() {
        let (mut state, ids) = scripted(&[3, 4, 5], 7);
        let old_epoch = state.clock.epoch;
        drag(&mut state, &ids[..2]);

        apply(&mut state, Command::StartGame);
        assert_ne!(state.clock.epoch, old_epoch);
        assert_eq!((state.score, state.level), (0, 0));
        let count = state.bubbles.len();

        // Stale refill from the previous round is dropped
        let now = state.queue.now_ms();
        run_pending(&mut state, now + REPLENISH_DELAY_MS);
        assert_eq!(state.bubbles.len(), count);

        // Stale tick doesn't count down the new round
        apply(&mut state, Command::ClockTick { epoch: old_epoch });
        assert_eq!(state.clock.time_left, TIME_LIMIT);
    }

    #[test]
    fn test_start_without_play_area_keeps_clock_running() {
        let mut state = GameState::new(1, Settings::default());
        let events = apply(&mut state, Command::StartGame);
        assert!(state.is_running());
        assert!(state.bubbles.is_empty());
        assert!(matches!(events[0], GameEvent::GameStarted { .. }));

        let epoch = state.clock.epoch;
        for _ in 0..TIME_LIMIT {
            apply(&mut state, Command::ClockTick { epoch });
        }
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_resize_keeps_existing_bubbles_distinct() {
        let mut state = started(21);
        let before = state.bubbles.len();
        apply(&mut state, Command::Resize { width: 620.0, height: 500.0 });

        // Free a few cells, then refill on the new layout
        let ids: Vec<_> = state.bubbles.iter().take(5).map(|b| b.id).collect();
        state.bubbles.remove(&ids);
        let epoch = state.clock.epoch;
        state.post(Command::Replenish { epoch });
        run_pending(&mut state, 0.0);

        assert_eq!(state.bubbles.len(), before);
        let mut cells: Vec<GridCell> = state.bubbles.iter().map(|b| b.cell.unwrap()).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), before);
    }

    #[test]
    fn test_backtrack_then_match() {
        let (mut state, ids) = scripted(&[3, 4, 5], 7);
        let [p0, p1, p2] = [0, 1, 2].map(|i| pos_of(&state, ids[i]));
        apply(&mut state, Command::PointerDown(p0));
        apply(&mut state, Command::PointerMove(p1));
        apply(&mut state, Command::PointerMove(p2));
        assert_eq!(state.selection.sum(), 12);
        let events = apply(&mut state, Command::PointerMove(p1));
        assert!(matches!(
            &events[..],
            [GameEvent::SelectionChanged { sum: 7, .. }]
        ));
        apply(&mut state, Command::PointerUp);
        assert_eq!(state.score, 70);
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = started(99);
        let b = started(99);
        let va: Vec<_> = a.bubbles.iter().map(|b| (b.cell, b.value)).collect();
        let vb: Vec<_> = b.bubbles.iter().map(|b| (b.cell, b.value)).collect();
        assert_eq!(va, vb);
        assert_eq!(a.target, b.target);
    }
}
