//! Locking a piece into the playfield, clearing full rows, line-clear points.

use crate::controller::Piece;
use crate::playfield::{HEIGHT, Playfield};

/// Write the piece's cells into the playfield, then clear every full row.
/// Returns how many rows were cleared.
///
/// Rows are swept top to bottom in one pass. Clearing row `y` only shifts
/// rows above it, which have already been checked, so every row is
/// evaluated exactly once against its final contents.
pub fn merge(field: &mut Playfield, piece: &Piece) -> u32 {
    for cell in piece.cells {
        field.place(cell);
    }
    let mut cleared = 0;
    for y in 0..HEIGHT {
        if field.is_row_full(y) {
            field.clear_row(y);
            cleared += 1;
        }
    }
    cleared
}

/// Points for clearing `lines` rows at once. Zero for nothing (or anything past four).
pub const fn line_clear_points(lines: u32, level: u32) -> u32 {
    let base = match lines {
        1 => 45,
        2 => 100,
        3 => 300,
        4 => 1000,
        _ => 0,
    };
    base * level
}
