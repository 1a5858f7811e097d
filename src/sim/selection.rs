//! Drag-gesture selection tracking
//!
//! Bubbles are picked by square hitboxes. A gesture can only extend to a
//! bubble within the link distance of the last pick, and re-entering the
//! second-to-last pick undoes the last one.

use glam::Vec2;

use super::state::BubbleId;
use super::store::BubbleStore;
use crate::consts::HITBOX_HALF;
use crate::in_square;

/// Ordered, duplicate-free set of picked bubbles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<BubbleId>,
    sum: u32,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks in selection order
    pub fn ids(&self) -> &[BubbleId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: BubbleId) -> bool {
        self.ids.contains(&id)
    }

    /// Sum of the picked values
    pub fn sum(&self) -> u32 {
        self.sum
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.sum = 0;
    }

    /// A release now would score
    pub fn is_match(&self, target: u32) -> bool {
        self.ids.len() >= 2 && self.sum == target
    }

    /// Run one pointer sample against every live bubble.
    /// Returns true if the selection changed.
    pub fn hit_test(&mut self, store: &BubbleStore, pos: Vec2, link_distance: f32) -> bool {
        let mut changed = false;

        for bubble in store.iter() {
            let inside = in_square(pos, bubble.pos, HITBOX_HALF);
            if !inside {
                continue;
            }

            // Backtrack: stepping onto the previous pick undoes the last one
            if self.ids.len() >= 2 && self.ids[self.ids.len() - 2] == bubble.id {
                self.ids.pop();
                changed = true;
                break;
            }

            if self.contains(bubble.id) {
                continue;
            }
            if let Some(last) = self.ids.last().and_then(|id| store.get(*id)) {
                if last.pos.distance(bubble.pos) > link_distance {
                    continue;
                }
            }
            self.ids.push(bubble.id);
            changed = true;
        }

        if changed {
            self.recompute(store);
        }
        changed
    }

    /// Recount the sum from scratch
    fn recompute(&mut self, store: &BubbleStore) {
        self.sum = self
            .ids
            .iter()
            .filter_map(|id| store.get(*id))
            .map(|b| b.value)
            .sum();
    }

    /// Equation text for the HUD, e.g. `3+4 = 7`
    pub fn equation(&self, store: &BubbleStore) -> String {
        if self.ids.is_empty() {
            return String::new();
        }
        let terms: Vec<String> = self
            .ids
            .iter()
            .filter_map(|id| store.get(*id))
            .map(|b| b.value.to_string())
            .collect();
        format!("{} = {}", terms.join("+"), self.sum)
    }

    /// Centers of the picked bubbles, in pick order
    pub fn centers(&self, store: &BubbleStore) -> Vec<Vec2> {
        self.ids
            .iter()
            .filter_map(|id| store.get(*id))
            .map(|b| b.pos)
            .collect()
    }
}
