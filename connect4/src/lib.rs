//! Connect 4 engine with depth-limited minimax.
//! Positions are immutable values: every move produces a fresh successor
//! carrying its own copy of the grid and a utility computed once, at
//! construction. The search walks successors column by column, left to
//! right, and returns the next position to play together with its
//! backed-up value.
pub mod bitboard;
pub mod error;
pub mod eval;
pub mod game;
pub mod grid;
pub mod search;
pub mod state;
pub mod strategy;

pub use bitboard::BitBoard;
pub use error::GameError;
pub use eval::{evaluate, Occupancy, Orientation};
pub use game::{play_game, GameConfig, GameSummary, Outcome, Turn};
pub use grid::{Cell, Grid};
pub use search::{max_layer, min_layer, Minimax, Scored, SearchStats};
pub use state::State;
pub use strategy::{AlphaBeta, MinimaxStrategy, Strategy};

/// Number of columns, and the maximum number of successors of a position.
pub const WIDTH: usize = 7;
/// Number of pieces a column holds.
pub const HEIGHT: usize = 6;
pub const MAX_CELLS: usize = WIDTH * HEIGHT;
/// Utility of a decided position: positive when Max has four in a row,
/// negated when Min has.
pub const WINNER: i32 = 1000;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    Max,
    Min,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Max => Side::Min,
            Side::Min => Side::Max,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Side::Max => Cell::Max,
            Side::Min => Cell::Min,
        }
    }

    /// +1 for Max, -1 for Min: turns a utility into a score for this side.
    pub fn sign(self) -> i32 {
        match self {
            Side::Max => 1,
            Side::Min => -1,
        }
    }

    /// Strict comparison, so the first of several equal values is kept.
    pub fn prefers(self, candidate: i32, incumbent: i32) -> bool {
        match self {
            Side::Max => candidate > incumbent,
            Side::Min => candidate < incumbent,
        }
    }
}

/// Query contract shared by every board representation the search and the
/// strategies can work with.
pub trait Position: Clone {
    /// Piece at `(col, row)`, row 0 being the bottom.
    ///
    /// Panics if the coordinate lies outside the 7x6 grid.
    fn piece_at(&self, col: usize, row: usize) -> Cell;

    /// Number of pieces stacked in `col`.
    fn column_height(&self, col: usize) -> usize;

    /// Cached heuristic value; `WINNER` or `-WINNER` once a side has won.
    fn utility(&self) -> i32;

    /// Position after `side` drops a piece into `col`, or `None` when the
    /// column is already full.
    fn successor(&self, col: usize, side: Side) -> Option<Self>;

    fn is_full(&self) -> bool {
        (0..WIDTH).all(|col| self.column_height(col) == HEIGHT)
    }

    /// Won by either side, or drawn on a full grid.
    fn is_terminal(&self) -> bool {
        self.utility().abs() >= WINNER || self.is_full()
    }
}
