//! Grid store - the fixed-size 2D array of cells

use std::collections::BTreeMap;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::simulation::{Cell, Substances, cell_flags};

/// Grid dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

impl GridSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Derive cell dimensions from a world size in pixels and the pixel size of one cell
    pub fn from_world(world_width: u32, world_height: u32, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        Self {
            width: (world_width / cell_size) as usize,
            height: (world_height / cell_size) as usize,
        }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Result of a swap request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Contents exchanged
    Swapped,
    /// One side already moved this tick; nothing changed
    Blocked,
}

/// Fixed-size grid of cells, row-major, y grows downward
#[derive(Debug, Clone)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
    /// Block swaps involving a cell that already moved this tick
    track_moved: bool,
}

impl Grid {
    /// Create a grid filled with air
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![Cell::EMPTY; size.area()],
            track_moved: false,
        }
    }

    pub fn with_move_tracking(mut self, track_moved: bool) -> Self {
        self.track_moved = track_moved;
        self
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.width
    }

    pub fn height(&self) -> usize {
        self.size.height
    }

    pub fn tracks_moved(&self) -> bool {
        self.track_moved
    }

    /// `0 <= x < width && 0 <= y < height`
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size.width && (y as usize) < self.size.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        assert!(
            self.in_bounds(x, y),
            "cell ({}, {}) outside {}x{} grid",
            x,
            y,
            self.size.width,
            self.size.height
        );
        y as usize * self.size.width + x as usize
    }

    /// Copy of the cell at (x, y); callers must check `in_bounds` first
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.cells[self.index(x, y)]
    }

    /// Substance id at (x, y); callers must check `in_bounds` first
    pub fn substance(&self, x: i32, y: i32) -> u16 {
        self.get(x, y).substance
    }

    /// Overwrite the cell at (x, y)
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        let idx = self.index(x, y);
        self.cells[idx] = cell;
    }

    /// Replace the cell at (x, y) with a fresh cell of `substance`
    pub fn set_substance(&mut self, x: i32, y: i32, substance: u16) {
        self.set(x, y, Cell::new(substance));
    }

    /// Exchange two cells.
    ///
    /// Always reports `true`, including when move tracking blocks the swap;
    /// the caller treats the cell as handled either way.
    pub fn swap(&mut self, a: IVec2, b: IVec2) -> bool {
        self.try_swap(a, b);
        true
    }

    /// Exchange two cells, reporting whether move tracking blocked it.
    ///
    /// With tracking enabled the substance that ends up at `b` is marked as
    /// moved until the next [`Grid::clear_moved`].
    pub fn try_swap(&mut self, a: IVec2, b: IVec2) -> SwapOutcome {
        let ia = self.index(a.x, a.y);
        let ib = self.index(b.x, b.y);

        if self.track_moved && (self.cells[ia].has_moved() || self.cells[ib].has_moved()) {
            return SwapOutcome::Blocked;
        }

        self.cells.swap(ia, ib);
        if self.track_moved {
            self.cells[ib].flags |= cell_flags::MOVED;
        }
        SwapOutcome::Swapped
    }

    /// Set every in-bounds cell of the square `[cx-r, cx+r] x [cy-r, cy+r]`
    pub fn fill_region(&mut self, cx: i32, cy: i32, radius: u32, substance: u16) {
        let r = radius as i32;

        for dy in -r..=r {
            for dx in -r..=r {
                let x = cx + dx;
                let y = cy + dy;
                if self.in_bounds(x, y) {
                    self.set_substance(x, y, substance);
                }
            }
        }
    }

    /// Set every cell to `substance`
    pub fn reset_all(&mut self, substance: u16) {
        self.cells.fill(Cell::new(substance));
    }

    /// Forget which cells moved during the previous tick
    pub fn clear_moved(&mut self) {
        for cell in &mut self.cells {
            cell.flags &= !cell_flags::MOVED;
        }
    }

    /// Display color of the cell at (x, y)
    pub fn color_at(&self, x: i32, y: i32, substances: &Substances) -> [u8; 4] {
        substances.color(self.substance(x, y))
    }

    /// Number of cells holding `substance`
    pub fn count(&self, substance: u16) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.substance == substance)
            .count()
    }

    /// Multiset of substance ids present in the grid
    pub fn histogram(&self) -> BTreeMap<u16, usize> {
        let mut histogram = BTreeMap::new();
        for cell in &self.cells {
            *histogram.entry(cell.substance).or_insert(0) += 1;
        }
        histogram
    }

    /// Row-major view of every cell
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
