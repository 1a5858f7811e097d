//! Authoritative set of live bubbles

use std::collections::HashSet;
use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;

use super::grid::{GridLayout, allocate_cells};
use super::state::{Bubble, BubbleId, GridCell};
use crate::consts::BUBBLE_RADIUS;

/// Live bubbles in spawn order, plus the id allocator
#[derive(Debug, Clone)]
pub struct BubbleStore {
    bubbles: Vec<Bubble>,
    next_id: BubbleId,
}

impl Default for BubbleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BubbleStore {
    pub fn new() -> Self {
        Self {
            bubbles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.iter()
    }

    pub fn as_slice(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    fn allocate_id(&mut self) -> BubbleId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Cells held by live bubbles. Bubbles without a logical cell are
    /// snapped to the cell under their center (and keep it from now on).
    pub fn claim_cells(&mut self, layout: &GridLayout) -> HashSet<GridCell> {
        self.bubbles
            .iter_mut()
            .map(|b| *b.cell.get_or_insert_with(|| layout.cell_at(b.pos)))
            .collect()
    }

    /// Spawn up to `count` bubbles on free cells with random values.
    /// Returns the ids actually created.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        layout: &GridLayout,
        count: usize,
        values: RangeInclusive<u32>,
        rng: &mut R,
    ) -> Vec<BubbleId> {
        let occupied = self.claim_cells(layout);
        let cells = allocate_cells(layout, &occupied, count, rng);

        let mut ids = Vec::with_capacity(cells.len());
        for cell in cells {
            let value = rng.random_range(values.clone());
            let id = self.allocate_id();
            self.bubbles.push(Bubble {
                id,
                value,
                cell: Some(cell),
                pos: layout.cell_center(cell),
                radius: BUBBLE_RADIUS,
            });
            ids.push(id);
        }
        ids
    }

    /// Place a bubble by screen position only (no logical cell yet)
    pub fn insert(&mut self, value: u32, pos: Vec2) -> BubbleId {
        let id = self.allocate_id();
        self.bubbles.push(Bubble {
            id,
            value,
            cell: None,
            pos,
            radius: BUBBLE_RADIUS,
        });
        id
    }

    /// Remove the given bubbles, returning the ones that were live
    pub fn remove(&mut self, ids: &[BubbleId]) -> Vec<Bubble> {
        let mut removed = Vec::with_capacity(ids.len());
        self.bubbles.retain(|b| {
            if ids.contains(&b.id) {
                removed.push(b.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Drop every bubble (level reset). Ids keep counting up.
    pub fn clear(&mut self) -> Vec<BubbleId> {
        self.bubbles.drain(..).map(|b| b.id).collect()
    }
}
