//! Bitboard representation of a position: one `u64` mask per side, with a
//! sentinel row on top of every column to keep the shift arithmetic from
//! wrapping between columns.
use crate::eval::{evaluate, Occupancy};
use crate::grid::Cell;
use crate::{Position, Side, HEIGHT, WIDTH};

/// Bits per column: the spare top bit stays clear, so a run of pieces can
/// never continue into the next column.
const STRIDE: usize = HEIGHT + 1;

/// Bit distance between neighbouring cells of a line, in `Orientation::ALL`
/// order: horizontal, vertical, rising left, rising right.
const LINE_STEPS: [usize; 4] = [STRIDE, 1, STRIDE - 1, STRIDE + 1];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitBoard {
    players: [u64; 2],
    heights: [u8; WIDTH],
    utility: i32,
}

impl BitBoard {
    pub fn new() -> Self {
        Self {
            players: [0, 0],
            heights: [0; WIDTH],
            utility: 0,
        }
    }

    /// Copies the pieces of any position; the utility is copied as is.
    pub fn from_position<P: Position>(position: &P) -> Self {
        let mut board = Self::new();
        for col in 0..WIDTH {
            for row in 0..position.column_height(col) {
                match position.piece_at(col, row) {
                    Cell::Max => board.players[0] |= bit_for(col, row),
                    Cell::Min => board.players[1] |= bit_for(col, row),
                    Cell::Empty => break,
                }
                board.heights[col] += 1;
            }
        }
        board.utility = position.utility();
        board
    }

    pub fn bits(&self, side: Side) -> u64 {
        self.players[idx(side)]
    }

    /// Shift-based four-in-a-row test, independent of the evaluator.
    pub fn has_four(&self, side: Side) -> bool {
        has_won(self.bits(side))
    }
}

impl Default for BitBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Occupancy for BitBoard {
    fn cell(&self, col: usize, row: usize) -> Cell {
        self.piece_at(col, row)
    }
}

impl Position for BitBoard {
    fn piece_at(&self, col: usize, row: usize) -> Cell {
        assert!(
            col < WIDTH && row < HEIGHT,
            "cell ({col}, {row}) is outside the {WIDTH}x{HEIGHT} grid"
        );
        let bit = bit_for(col, row);
        if self.players[0] & bit != 0 {
            Cell::Max
        } else if self.players[1] & bit != 0 {
            Cell::Min
        } else {
            Cell::Empty
        }
    }

    fn column_height(&self, col: usize) -> usize {
        self.heights[col] as usize
    }

    fn utility(&self) -> i32 {
        self.utility
    }

    fn successor(&self, col: usize, side: Side) -> Option<Self> {
        let height = self.heights[col] as usize;
        if height >= HEIGHT {
            return None;
        }
        let mut next = self.clone();
        next.players[idx(side)] |= bit_for(col, height);
        next.heights[col] += 1;
        next.utility = evaluate(&next);
        Some(next)
    }
}

fn idx(side: Side) -> usize {
    match side {
        Side::Max => 0,
        Side::Min => 1,
    }
}

fn bit_for(col: usize, row: usize) -> u64 {
    1 << (STRIDE * col + row)
}

/// True if `bits` holds four consecutive cells along any line direction.
fn has_won(bits: u64) -> bool {
    LINE_STEPS.iter().any(|&step| {
        let pairs = bits & (bits >> step);
        pairs & (pairs >> (2 * step)) != 0
    })
}
