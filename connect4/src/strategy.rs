//! Move-selection engines the game loop can plug in for either side.
use tracing::debug;

use crate::bitboard::BitBoard;
use crate::error::GameError;
use crate::search::Minimax;
use crate::state::State;
use crate::{Position, Side, WIDTH};

/// Central columns take part in more windows, so trying them first
/// tightens the alpha-beta bounds early.
const MOVE_ORDER: [usize; WIDTH] = [3, 2, 4, 1, 5, 0, 6];

const INFINITY: i32 = i32::MAX / 2;

/// A player: given the current position, the side to play and a depth
/// limit, returns the position after its move.
pub trait Strategy {
    fn name(&self) -> &'static str;

    fn play(&mut self, state: &State, side: Side, depth: u32) -> Result<State, GameError>;

    /// Positions visited by every search so far.
    fn nodes_explored(&self) -> u64;
}

/// Plain minimax, see [`crate::search`].
#[derive(Debug, Default)]
pub struct MinimaxStrategy {
    search: Minimax,
}

impl MinimaxStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for MinimaxStrategy {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn play(&mut self, state: &State, side: Side, depth: u32) -> Result<State, GameError> {
        Ok(self.search.best_successor(state, side, depth)?.state)
    }

    fn nodes_explored(&self) -> u64 {
        self.search.stats().nodes
    }
}

/// Negamax with alpha-beta pruning over a [`BitBoard`], scoring the
/// frontier with the same utility as minimax. Reaches the same value as
/// minimax at equal depth, though ties may resolve to a different column.
#[derive(Debug, Default)]
pub struct AlphaBeta {
    nodes: u64,
}

impl AlphaBeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best child for `side` and its value from Max's point of view.
    pub fn search(&mut self, board: &BitBoard, side: Side, depth: u32) -> Result<(BitBoard, i32), GameError> {
        if depth == 0 {
            return Err(GameError::DepthOutOfRange(depth));
        }
        if board.is_terminal() {
            return Err(GameError::GameOver);
        }
        self.nodes += 1;

        let mut best = None;
        let mut alpha = -INFINITY;
        let beta = INFINITY;
        for col in MOVE_ORDER {
            let Some(child) = board.successor(col, side) else {
                continue;
            };
            let val = -self.negamax(&child, depth - 1, -beta, -alpha, side.opponent());
            if best.is_none() || val > alpha {
                alpha = val;
                best = Some(child);
            }
        }

        let child = best.ok_or(GameError::NoMoves)?;
        Ok((child, side.sign() * alpha))
    }

    fn negamax(&mut self, board: &BitBoard, depth: u32, mut alpha: i32, beta: i32, side: Side) -> i32 {
        self.nodes += 1;
        if depth == 0 || board.is_terminal() {
            return side.sign() * board.utility();
        }

        let mut best = -INFINITY;
        for col in MOVE_ORDER {
            let Some(child) = board.successor(col, side) else {
                continue;
            };
            let score = -self.negamax(&child, depth - 1, -beta, -alpha, side.opponent());
            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

impl Strategy for AlphaBeta {
    fn name(&self) -> &'static str {
        "alpha-beta"
    }

    fn play(&mut self, state: &State, side: Side, depth: u32) -> Result<State, GameError> {
        let before = self.nodes;
        let (child, value) = self.search(&BitBoard::from_position(state), side, depth)?;
        debug!(?side, depth, value, nodes = self.nodes - before, "alpha-beta search finished");
        Ok(State::from_position(&child))
    }

    fn nodes_explored(&self) -> u64 {
        self.nodes
    }
}
