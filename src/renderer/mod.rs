//! Selection path overlay
//!
//! Bubbles themselves are DOM elements. The overlay canvas only shows the
//! beam through the picked bubbles and, optionally, the square hitboxes.
//! `selection_overlay` builds backend-agnostic draw commands; `canvas`
//! replays them on a 2D context in the browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;

use crate::consts::{HITBOX_HALF, PATH_WIDTH};
use crate::sim::GameState;

/// Color palette (RGBA, 0..1)
pub mod colors {
    pub const HITBOX: [f32; 4] = [1.0, 0.0, 0.0, 0.5];
    pub const BEAM: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
}

/// Hitbox outline width
const HITBOX_LINE_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Wipe the whole overlay
    Clear,
    StrokeRect {
        min: Vec2,
        size: Vec2,
        color: [f32; 4],
        width: f32,
    },
    /// Open path through `points`
    Polyline {
        points: Vec<Vec2>,
        width: f32,
        color: [f32; 4],
    },
}

/// Overlay for the current frame. Empty (just a clear) outside a gesture.
pub fn selection_overlay(state: &GameState) -> Vec<DrawCommand> {
    let mut cmds = vec![DrawCommand::Clear];
    if !state.dragging {
        return cmds;
    }

    if state.settings.show_hitboxes {
        let size = Vec2::splat(HITBOX_HALF * 2.0);
        cmds.extend(state.bubbles.iter().map(|b| DrawCommand::StrokeRect {
            min: b.pos - Vec2::splat(HITBOX_HALF),
            size,
            color: colors::HITBOX,
            width: HITBOX_LINE_WIDTH,
        }));
    }

    if state.selection.is_empty() {
        return cmds;
    }

    let mut points = state.selection.centers(&state.bubbles);
    if let Some(cursor) = state.cursor {
        points.push(cursor);
    }
    cmds.push(DrawCommand::Polyline {
        points,
        width: PATH_WIDTH,
        color: colors::BEAM,
    });
    cmds
}

/// CSS color string for a palette entry
pub fn css_rgba(color: [f32; 4]) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Command, apply};

    fn board(show_hitboxes: bool) -> (GameState, Vec<u32>) {
        let settings = Settings {
            show_hitboxes,
            ..Settings::default()
        };
        let mut state = GameState::new(4, settings);
        apply(&mut state, Command::Resize { width: 500.0, height: 500.0 });
        apply(&mut state, Command::StartGame);
        state.bubbles.clear();
        let ids = [3, 4, 5]
            .iter()
            .enumerate()
            .map(|(i, v)| state.bubbles.insert(*v, Vec2::new(40.0 + 60.0 * i as f32, 40.0)))
            .collect();
        (state, ids)
    }

    #[test]
    fn test_idle_overlay_only_clears() {
        let (state, _) = board(true);
        assert_eq!(selection_overlay(&state), vec![DrawCommand::Clear]);
    }

    #[test]
    fn test_beam_ends_at_cursor() {
        let (mut state, _) = board(false);
        apply(&mut state, Command::PointerDown(Vec2::new(40.0, 40.0)));
        apply(&mut state, Command::PointerMove(Vec2::new(100.0, 40.0)));
        apply(&mut state, Command::PointerMove(Vec2::new(120.0, 50.0)));

        let cmds = selection_overlay(&state);
        assert_eq!(cmds.len(), 2);
        match &cmds[1] {
            DrawCommand::Polyline { points, width, .. } => {
                assert_eq!(
                    points,
                    &vec![
                        Vec2::new(40.0, 40.0),
                        Vec2::new(100.0, 40.0),
                        Vec2::new(120.0, 50.0)
                    ]
                );
                assert_eq!(*width, 10.0);
            }
            other => panic!("expected polyline, got {other:?}"),
        }
    }

    #[test]
    fn test_hitboxes_outline_every_bubble() {
        let (mut state, _) = board(true);
        // Press on empty space: dragging, nothing picked
        apply(&mut state, Command::PointerDown(Vec2::new(400.0, 400.0)));

        let cmds = selection_overlay(&state);
        let rects: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokeRect { min, size, .. } => Some((*min, *size)),
                _ => None,
            })
            .collect();
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0], (Vec2::new(15.0, 15.0), Vec2::splat(50.0)));
        assert!(!cmds.iter().any(|c| matches!(c, DrawCommand::Polyline { .. })));
    }

    #[test]
    fn test_css_rgba() {
        assert_eq!(css_rgba(colors::HITBOX), "rgba(255, 0, 0, 0.5)");
        assert_eq!(css_rgba(colors::BEAM), "rgba(255, 255, 255, 0.8)");
    }
}
