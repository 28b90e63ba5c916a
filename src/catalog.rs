//! Piece catalog: the seven tetromino kinds and their spawn layouts.

/// Tetromino kinds (I, O, T, L, J, S, Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [Self::I, Self::O, Self::T, Self::L, Self::J, Self::S, Self::Z];

    /// Spawn positions (x, y) on the playfield. The first entry is the rotation pivot.
    pub const fn spawn_layout(self) -> [(i32, i32); 4] {
        match self {
            Self::I => [(4, 1), (4, 0), (4, 2), (4, 3)],
            Self::O => [(4, 0), (3, 0), (3, 1), (4, 1)],
            Self::T => [(4, 1), (4, 0), (3, 1), (5, 1)],
            Self::L => [(4, 1), (4, 0), (4, 2), (5, 2)],
            Self::J => [(4, 1), (4, 0), (4, 2), (3, 2)],
            Self::S => [(4, 0), (5, 0), (4, 1), (3, 1)],
            Self::Z => [(4, 0), (3, 0), (4, 1), (5, 1)],
        }
    }

    pub const fn color(self) -> CellColor {
        match self {
            Self::I => CellColor::Red,
            Self::O => CellColor::Cyan,
            Self::T => CellColor::Gray,
            Self::L => CellColor::Yellow,
            Self::J => CellColor::Magenta,
            Self::S => CellColor::Blue,
            Self::Z => CellColor::DarkGreen,
        }
    }
}

/// Colour identifier carried by every cell. Mapped to terminal colours by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellColor {
    Red,
    Cyan,
    Gray,
    Yellow,
    Magenta,
    Blue,
    DarkGreen,
}

/// One block: colour plus grid coordinates. Coordinates may be out of bounds
/// while a move or rotation candidate is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub color: CellColor,
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            color: self.color,
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The four cells of `kind` at their spawn positions.
pub fn shape_for(kind: PieceKind) -> [Cell; 4] {
    let color = kind.color();
    kind.spawn_layout().map(|(x, y)| Cell { color, x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playfield::{HEIGHT, WIDTH};

    #[test]
    fn every_shape_spawns_inside_the_playfield() {
        for kind in PieceKind::ALL {
            for cell in shape_for(kind) {
                assert!((0..WIDTH).contains(&cell.x), "{kind:?} x={}", cell.x);
                assert!((0..HEIGHT).contains(&cell.y), "{kind:?} y={}", cell.y);
                assert!((3..=5).contains(&cell.x));
                assert!((0..=3).contains(&cell.y));
            }
        }
    }

    #[test]
    fn shapes_have_four_distinct_cells_of_one_colour() {
        for kind in PieceKind::ALL {
            let cells = shape_for(kind);
            for (i, a) in cells.iter().enumerate() {
                assert_eq!(a.color, kind.color());
                for b in &cells[i + 1..] {
                    assert!((a.x, a.y) != (b.x, b.y), "{kind:?} has overlapping cells");
                }
            }
        }
    }

    #[test]
    fn pivot_is_first_cell() {
        let t = shape_for(PieceKind::T);
        assert_eq!((t[0].x, t[0].y), (4, 1));
        let s = shape_for(PieceKind::S);
        assert_eq!((s[0].x, s[0].y), (4, 0));
    }
}
