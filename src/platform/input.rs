//! Pointer input normalization
//!
//! Mouse and touch events both arrive in client (viewport) coordinates. The
//! simulation works in play-area pixels with the origin at the container's
//! top-left corner.

use glam::Vec2;

use crate::sim::Command;

/// Stage of a mouse or touch gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// mousedown / touchstart
    Start,
    /// mousemove / touchmove
    Move,
    /// mouseup / touchend
    End,
}

/// Client coordinates relative to the play area's origin
#[inline]
pub fn play_area_pos(client: Vec2, origin: Vec2) -> Vec2 {
    client - origin
}

/// Translate a raw pointer event into a simulation command.
///
/// `client` is `None` when a touch event carries no touch point; such
/// start/move events are dropped.
pub fn pointer_command(phase: PointerPhase, client: Option<Vec2>, origin: Vec2) -> Option<Command> {
    match phase {
        PointerPhase::Start => client.map(|c| Command::PointerDown(play_area_pos(c, origin))),
        PointerPhase::Move => client.map(|c| Command::PointerMove(play_area_pos(c, origin))),
        PointerPhase::End => Some(Command::PointerUp),
    }
}
