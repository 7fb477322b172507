//! Depth-limited minimax over [`Position`] successors.
//!
//! Columns are always tried left to right and a candidate only replaces the
//! current best on a strictly better value, so among equally valued moves
//! the lowest column wins.
use tracing::debug;

use crate::error::GameError;
use crate::{Position, Side, WIDTH};

/// A position paired with the value search backed up to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scored<P> {
    pub state: P,
    pub minimax: i32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Calls to either layer, frontier calls included.
    pub nodes: u64,
}

/// Best successor for Max, searching `depth` plies.
///
/// At depth 0 or on a terminal position the position itself comes back,
/// scored with its own utility: a valuation, not a move. `None` means no
/// column accepted a piece.
pub fn max_layer<P: Position>(state: &P, depth: u32, stats: &mut SearchStats) -> Option<Scored<P>> {
    layer(state, depth, Side::Max, stats)
}

/// Mirror of [`max_layer`] for Min.
pub fn min_layer<P: Position>(state: &P, depth: u32, stats: &mut SearchStats) -> Option<Scored<P>> {
    layer(state, depth, Side::Min, stats)
}

fn layer<P: Position>(state: &P, depth: u32, side: Side, stats: &mut SearchStats) -> Option<Scored<P>> {
    stats.nodes += 1;

    if depth == 0 || state.is_terminal() {
        return Some(Scored {
            state: state.clone(),
            minimax: state.utility(),
        });
    }

    let mut best: Option<Scored<P>> = None;
    for col in 0..WIDTH {
        let Some(child) = state.successor(col, side) else {
            continue;
        };
        let Some(reply) = layer(&child, depth - 1, side.opponent(), stats) else {
            continue;
        };
        let improves = match &best {
            None => true,
            Some(current) => side.prefers(reply.minimax, current.minimax),
        };
        if improves {
            best = Some(Scored {
                state: child,
                minimax: reply.minimax,
            });
        }
    }
    best
}

/// Minimax player that keeps a running node count across searches.
#[derive(Debug, Default)]
pub struct Minimax {
    stats: SearchStats,
}

impl Minimax {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Next position for `side`, searched `depth` plies deep.
    ///
    /// Unlike the raw layers this refuses a zero depth and a finished
    /// game, so the result is always a real move.
    pub fn best_successor<P: Position>(
        &mut self,
        state: &P,
        side: Side,
        depth: u32,
    ) -> Result<Scored<P>, GameError> {
        if depth == 0 {
            return Err(GameError::DepthOutOfRange(depth));
        }
        if state.is_terminal() {
            return Err(GameError::GameOver);
        }
        let before = self.stats.nodes;
        let scored = layer(state, depth, side, &mut self.stats).ok_or(GameError::NoMoves)?;
        let column = (0..WIDTH).find(|&col| scored.state.column_height(col) != state.column_height(col));
        debug!(
            ?side,
            depth,
            ?column,
            minimax = scored.minimax,
            nodes = self.stats.nodes - before,
            "minimax search finished"
        );
        Ok(scored)
    }
}
