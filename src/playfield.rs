//! Playfield: fixed 10x20 grid of settled cells. y=0 is the top row.

use crate::catalog::{Cell, CellColor};

/// Playfield width in columns.
pub const WIDTH: i32 = 10;
/// Playfield height in rows.
pub const HEIGHT: i32 = 20;

const COLS: usize = WIDTH as usize;
const ROWS: usize = HEIGHT as usize;

type Row = [Option<CellColor>; COLS];

/// Dense grid of settled cells. `rows[y][x]` is the slot at (x, y);
/// coordinates are implied by the slot, so a settled cell is just its colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playfield {
    rows: [Row; ROWS],
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new()
    }
}

impl Playfield {
    pub const fn new() -> Self {
        Self {
            rows: [[None; COLS]; ROWS],
        }
    }

    /// Empty every slot in place.
    pub fn clear(&mut self) {
        self.rows = [[None; COLS]; ROWS];
    }

    fn slot(x: i32, y: i32) -> Option<(usize, usize)> {
        let in_bounds = (0..WIDTH).contains(&x) && (0..HEIGHT).contains(&y);
        in_bounds.then(|| (x as usize, y as usize))
    }

    /// Colour of the settled cell at (x, y); `None` when empty or out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<CellColor> {
        Self::slot(x, y).and_then(|(x, y)| self.rows[y][x])
    }

    #[inline]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some()
    }

    /// True if (x, y) is inside the grid and empty.
    #[inline]
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        Self::slot(x, y).is_some_and(|(x, y)| self.rows[y][x].is_none())
    }

    /// True if every cell is inside the grid and lands on an empty slot.
    pub fn accepts(&self, cells: &[Cell]) -> bool {
        cells.iter().all(|c| self.is_free(c.x, c.y))
    }

    /// Write a cell at its own coordinates. Out-of-bounds cells are ignored.
    pub fn place(&mut self, cell: Cell) {
        if let Some((x, y)) = Self::slot(cell.x, cell.y) {
            self.rows[y][x] = Some(cell.color);
        }
    }

    pub fn is_row_full(&self, y: i32) -> bool {
        Self::slot(0, y).is_some_and(|(_, y)| self.rows[y].iter().all(Option::is_some))
    }

    /// Remove row `y` and shift every row above it down by one. The top row becomes empty.
    pub fn clear_row(&mut self, y: i32) {
        let Some((_, y)) = Self::slot(0, y) else {
            return;
        };
        self.rows.copy_within(0..y, 1);
        self.rows[0] = [None; COLS];
    }

    /// Number of settled cells.
    #[cfg(test)]
    pub fn occupied_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Rows top to bottom, for rendering.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<CellColor>]> {
        self.rows.iter().map(|r| r.as_slice())
    }
}
