//! Fixed-cell layout grid over the play area
//!
//! The grid is centered: leftover space that doesn't fit a whole cell is
//! split evenly on both sides.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::state::GridCell;

/// Grid geometry for one play-area size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub width: f32,
    pub height: f32,
    pub cell_size: f32,
    pub cols: i32,
    pub rows: i32,
    /// Top-left corner of cell (0, 0)
    pub offset: Vec2,
}

impl GridLayout {
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let cols = (width / cell_size).floor() as i32;
        let rows = (height / cell_size).floor() as i32;
        let offset = Vec2::new(
            (width - cols as f32 * cell_size) / 2.0,
            (height - rows as f32 * cell_size) / 2.0,
        );
        Self {
            width,
            height,
            cell_size,
            cols,
            rows,
            offset,
        }
    }

    /// True if not a single cell fits
    pub fn is_empty(&self) -> bool {
        self.cols <= 0 || self.rows <= 0
    }

    pub fn cell_count(&self) -> usize {
        (self.cols.max(0) * self.rows.max(0)) as usize
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        (0..self.cols).contains(&cell.col) && (0..self.rows).contains(&cell.row)
    }

    /// Pixel center of a cell
    pub fn cell_center(&self, cell: GridCell) -> Vec2 {
        self.offset
            + Vec2::new(cell.col as f32, cell.row as f32) * self.cell_size
            + Vec2::splat(self.cell_size / 2.0)
    }

    /// Cell under a pixel position (may be outside the grid)
    pub fn cell_at(&self, pos: Vec2) -> GridCell {
        let local = (pos - self.offset) / self.cell_size;
        GridCell::new(local.x.floor() as i32, local.y.floor() as i32)
    }

    /// Unoccupied cells in row-major order
    pub fn free_cells(&self, occupied: &HashSet<GridCell>) -> Vec<GridCell> {
        let mut free = Vec::with_capacity(self.cell_count());
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = GridCell::new(col, row);
                if !occupied.contains(&cell) {
                    free.push(cell);
                }
            }
        }
        free
    }
}

/// Pick up to `count` distinct free cells, uniformly shuffled.
/// Returns fewer (possibly zero) when the grid is full.
pub fn allocate_cells<R: Rng + ?Sized>(
    layout: &GridLayout,
    occupied: &HashSet<GridCell>,
    count: usize,
    rng: &mut R,
) -> Vec<GridCell> {
    let mut free = layout.free_cells(occupied);
    free.shuffle(rng);
    free.truncate(count);
    free
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_layout_centers_leftover_space() {
        let layout = GridLayout::new(500.0, 500.0, 60.0);
        assert_eq!((layout.cols, layout.rows), (8, 8));
        // 500 - 480 = 20, split evenly
        assert_eq!(layout.offset, Vec2::new(10.0, 10.0));
        assert_eq!(layout.cell_center(GridCell::new(0, 0)), Vec2::new(40.0, 40.0));
        assert_eq!(layout.cell_center(GridCell::new(7, 7)), Vec2::new(460.0, 460.0));
    }

    #[test]
    fn test_cell_at_inverts_cell_center() {
        let layout = GridLayout::new(730.0, 410.0, 60.0);
        for row in 0..layout.rows {
            for col in 0..layout.cols {
                let cell = GridCell::new(col, row);
                assert_eq!(layout.cell_at(layout.cell_center(cell)), cell);
            }
        }
    }

    #[test]
    fn test_tiny_area_has_no_cells() {
        let layout = GridLayout::new(59.0, 500.0, 60.0);
        assert!(layout.is_empty());
        assert!(layout.free_cells(&HashSet::new()).is_empty());
    }

    #[test]
    fn test_allocate_skips_occupied_and_caps_count() {
        let layout = GridLayout::new(180.0, 120.0, 60.0); // 3x2
        let occupied: HashSet<_> = [GridCell::new(0, 0), GridCell::new(2, 1)].into();
        let mut rng = Pcg32::seed_from_u64(1);

        let cells = allocate_cells(&layout, &occupied, 10, &mut rng);
        assert_eq!(cells.len(), 4);
        let unique: HashSet<_> = cells.iter().copied().collect();
        assert_eq!(unique.len(), 4);
        assert!(cells.iter().all(|c| !occupied.contains(c) && layout.contains(*c)));
    }

    #[test]
    fn test_allocate_full_grid_spawns_nothing() {
        let layout = GridLayout::new(120.0, 60.0, 60.0);
        let occupied: HashSet<_> = [GridCell::new(0, 0), GridCell::new(1, 0)].into();
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(allocate_cells(&layout, &occupied, 3, &mut rng).is_empty());
    }
}
