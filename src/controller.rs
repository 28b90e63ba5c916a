//! Active piece: spawning, translation, rotation with position-based wall kicks.

use crate::catalog::{Cell, PieceKind, shape_for};
use crate::playfield::{Playfield, WIDTH};

/// Upper bound on corrective passes during one rotation. A piece spans at most
/// four columns, so a legal kick needs far fewer.
const KICK_PASS_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    const fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }
}

/// Current piece: kind plus its four absolute cells. The first cell is the rotation pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub cells: [Cell; 4],
}

impl Piece {
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            cells: shape_for(kind),
        }
    }

    fn translated(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            kind: self.kind,
            cells: self.cells.map(|c| c.offset(dx, dy)),
        }
    }

    /// Quarter turn about the first cell: (dx, dy) -> (dy, -dx).
    fn rotated(&self) -> Self {
        let pivot = self.cells[0];
        let cells = self.cells.map(|c| {
            let (dx, dy) = (c.x - pivot.x, c.y - pivot.y);
            Cell {
                color: c.color,
                x: pivot.x + dy,
                y: pivot.y - dx,
            }
        });
        Self {
            kind: self.kind,
            cells,
        }
    }
}

/// Result of placing a freshly spawned piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Spawn {
    Placed,
    /// A spawn cell is already occupied; the game is over.
    TopOut,
}

/// Owns the falling piece. Every change is built as a candidate, checked
/// against the playfield, then committed whole.
#[derive(Debug, Clone)]
pub struct PieceController {
    piece: Piece,
}

impl PieceController {
    pub fn new(kind: PieceKind) -> Self {
        Self {
            piece: Piece::spawn(kind),
        }
    }

    pub const fn piece(&self) -> &Piece {
        &self.piece
    }

    /// Replace the current piece with a fresh `kind` at its spawn position.
    /// The playfield is never written here; on `TopOut` the piece is kept only for display.
    pub fn spawn(&mut self, kind: PieceKind, field: &Playfield) -> Spawn {
        self.piece = Piece::spawn(kind);
        if self.piece.cells.iter().any(|c| field.is_occupied(c.x, c.y)) {
            Spawn::TopOut
        } else {
            Spawn::Placed
        }
    }

    /// Move every cell one step, or none of them. Returns whether the move happened.
    pub fn try_move(&mut self, direction: Direction, field: &Playfield) -> bool {
        let candidate = self.piece.translated(direction);
        if field.accepts(&candidate.cells) {
            self.piece = candidate;
            true
        } else {
            false
        }
    }

    /// Rotate a quarter turn. The O piece never rotates.
    ///
    /// When the rotated candidate is illegal, each of its cells that pokes out
    /// past the left wall, right wall or ceiling nudges the pre-rotation piece
    /// one step back in (right, left, down respectively; each nudge only taken
    /// if legal) and the rotation is retried. There is no correction for the
    /// floor. Gives up when a pass finds nothing to correct, leaving the piece
    /// exactly as it was.
    pub fn rotate(&mut self, field: &Playfield) -> bool {
        if self.piece.kind == PieceKind::O {
            return false;
        }
        let mut working = self.piece;
        for _ in 0..KICK_PASS_LIMIT {
            let candidate = working.rotated();
            if field.accepts(&candidate.cells) {
                self.piece = candidate;
                return true;
            }
            let mut corrected = false;
            for cell in candidate.cells {
                let nudge = if cell.x < 0 {
                    Direction::Right
                } else if cell.x > WIDTH - 1 {
                    Direction::Left
                } else if cell.y < 0 {
                    Direction::Down
                } else {
                    continue;
                };
                corrected = true;
                let moved = working.translated(nudge);
                if field.accepts(&moved.cells) {
                    working = moved;
                }
            }
            if !corrected {
                break;
            }
        }
        false
    }
}
