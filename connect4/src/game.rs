//! Turn loop pitting two strategies against each other.
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::error::GameError;
use crate::state::State;
use crate::strategy::Strategy;
use crate::{Position, Side, WINNER};

pub const DEFAULT_DEPTH: u32 = 9;

/// Search depth of each side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub min_depth: u32,
    pub max_depth: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_depth: DEFAULT_DEPTH,
            max_depth: DEFAULT_DEPTH,
        }
    }
}

impl GameConfig {
    /// Reads `<min-depth> <max-depth>`; both must be positive integers.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, GameError> {
        let [min, max] = args else {
            return Err(GameError::InvalidArguments(format!(
                "expected 2 depths, got {}",
                args.len()
            )));
        };
        Ok(Self {
            min_depth: parse_depth(min.as_ref())?,
            max_depth: parse_depth(max.as_ref())?,
        })
    }

    pub fn depth(&self, side: Side) -> u32 {
        match side {
            Side::Max => self.max_depth,
            Side::Min => self.min_depth,
        }
    }
}

fn parse_depth(arg: &str) -> Result<u32, GameError> {
    match arg.trim().parse::<u32>() {
        Ok(0) => Err(GameError::InvalidArguments("depth must be at least 1".to_string())),
        Ok(depth) => Ok(depth),
        Err(err) => Err(GameError::InvalidArguments(format!("bad depth {arg:?}: {err}"))),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    MaxWins,
    MinWins,
    Draw,
}

impl Outcome {
    pub fn of(state: &State) -> Option<Outcome> {
        match state.utility() {
            u if u >= WINNER => Some(Outcome::MaxWins),
            u if u <= -WINNER => Some(Outcome::MinWins),
            _ if state.is_full() => Some(Outcome::Draw),
            _ => None,
        }
    }
}

/// A move that has just been played.
#[derive(Debug)]
pub struct Turn<'a> {
    pub side: Side,
    pub column: usize,
    pub state: &'a State,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Nodes explored by Min's engine.
    pub nodes_explored: u64,
    /// Nodes explored by Max's engine.
    pub opponent_nodes: u64,
    pub utility: i32,
    pub outcome: Outcome,
    pub min_depth: u32,
    pub max_depth: u32,
    pub moves: Vec<usize>,
}

/// Plays from `start` until the game ends. Max moves with `max_player`,
/// Min with `min_player`; every returned position is copied into a plain
/// [`State`] before it is used and reported to `on_turn`.
pub fn play_game<F>(
    config: GameConfig,
    start: State,
    max_player: &mut dyn Strategy,
    min_player: &mut dyn Strategy,
    mut on_turn: F,
) -> Result<GameSummary, GameError>
where
    F: FnMut(&Turn<'_>),
{
    info!(
        max = max_player.name(),
        min = min_player.name(),
        min_depth = config.min_depth,
        max_depth = config.max_depth,
        "starting game"
    );

    let mut state = start;
    let mut side = state.side_to_move();
    let mut moves = Vec::new();
    let outcome = loop {
        if let Some(outcome) = Outcome::of(&state) {
            break outcome;
        }
        let player: &mut dyn Strategy = match side {
            Side::Max => &mut *max_player,
            Side::Min => &mut *min_player,
        };
        let next = State::from_position(&player.play(&state, side, config.depth(side))?);
        let column = state.played_column(&next).ok_or(GameError::NoMoves)?;
        trace!(?side, column, utility = next.utility(), "move played");
        moves.push(column);
        on_turn(&Turn {
            side,
            column,
            state: &next,
        });
        state = next;
        side = side.opponent();
    };

    let summary = GameSummary {
        nodes_explored: min_player.nodes_explored(),
        opponent_nodes: max_player.nodes_explored(),
        utility: state.utility(),
        outcome,
        min_depth: config.min_depth,
        max_depth: config.max_depth,
        moves,
    };
    info!(
        outcome = ?summary.outcome,
        utility = summary.utility,
        nodes = summary.nodes_explored,
        "game over"
    );
    Ok(summary)
}
