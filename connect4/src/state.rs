use std::fmt;

use crate::error::GameError;
use crate::eval::evaluate;
use crate::grid::{Cell, Grid};
use crate::{Position, Side, HEIGHT, WIDTH};

/// A board together with its utility, computed once when the state is
/// built and never again.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State {
    grid: Grid,
    utility: i32,
}

impl State {
    pub fn new() -> Self {
        Self::from_grid(Grid::new())
    }

    pub fn from_grid(grid: Grid) -> Self {
        let utility = evaluate(&grid);
        Self { grid, utility }
    }

    /// Copies any position verbatim, utility included.
    pub fn from_position<P: Position>(position: &P) -> Self {
        let mut grid = Grid::new();
        for col in 0..WIDTH {
            for row in 0..position.column_height(col) {
                let cell = position.piece_at(col, row);
                debug_assert!(cell != Cell::Empty, "gap in column {col}");
                grid.drop_piece(col, cell);
            }
        }
        let utility = position.utility();
        debug_assert_eq!(utility, evaluate(&grid), "copied utility is stale");
        Self { grid, utility }
    }

    /// Replays a move history such as `X3O3X4`: a side letter (`X` for Max,
    /// `O` for Min) followed by a column digit, repeated. Sides need not
    /// alternate.
    pub fn from_moves(history: &str) -> Result<Self, GameError> {
        let mut state = Self::new();
        for (side, column) in parse_history(history)? {
            state = state.play(column, side)?;
        }
        Ok(state)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Checked counterpart of [`Position::successor`].
    pub fn play(&self, column: usize, side: Side) -> Result<Self, GameError> {
        if column >= WIDTH {
            return Err(GameError::ColumnOutOfBounds { column });
        }
        self.successor(column, side)
            .ok_or(GameError::ColumnFull { column })
    }

    /// Column that was filled to get from `self` to `next`, if `next` is
    /// exactly one piece ahead.
    pub fn played_column<P: Position>(&self, next: &P) -> Option<usize> {
        let mut changed = (0..WIDTH).filter(|&col| self.column_height(col) != next.column_height(col));
        let column = changed.next()?;
        if changed.next().is_some() || next.column_height(column) != self.column_height(column) + 1 {
            return None;
        }
        Some(column)
    }

    /// Max opens the game, so Max is to move whenever it has not placed
    /// more pieces than Min.
    pub fn side_to_move(&self) -> Side {
        if self.grid.count(Cell::Max) <= self.grid.count(Cell::Min) {
            Side::Max
        } else {
            Side::Min
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl Position for State {
    fn piece_at(&self, col: usize, row: usize) -> Cell {
        self.grid.piece_at(col, row)
    }

    fn column_height(&self, col: usize) -> usize {
        self.grid.column_height(col)
    }

    fn utility(&self) -> i32 {
        self.utility
    }

    fn successor(&self, col: usize, side: Side) -> Option<Self> {
        if self.grid.column_height(col) >= HEIGHT {
            return None;
        }
        let mut grid = self.grid.clone();
        grid.drop_piece(col, side.cell())?;
        Some(Self::from_grid(grid))
    }

    fn is_full(&self) -> bool {
        self.grid.is_full()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.grid, f)
    }
}

fn parse_history(history: &str) -> Result<Vec<(Side, usize)>, GameError> {
    let chars: Vec<char> = history.chars().filter(|c| !c.is_whitespace()).collect();
    let mut moves = Vec::with_capacity(chars.len() / 2);
    let mut idx = 0;
    while idx < chars.len() {
        let side = match chars[idx] {
            'X' | 'x' => Side::Max,
            'O' | 'o' => Side::Min,
            other => {
                return Err(GameError::ParseMove {
                    position: idx,
                    reason: format!("expected X or O, found {other}"),
                })
            }
        };
        idx += 1;
        let column = match chars.get(idx) {
            None => {
                return Err(GameError::ParseMove {
                    position: idx,
                    reason: "missing column number".to_string(),
                })
            }
            Some(c) => c.to_digit(10).ok_or_else(|| GameError::ParseMove {
                position: idx,
                reason: format!("expected column digit, found {c}"),
            })?,
        };
        if column as usize >= WIDTH {
            return Err(GameError::ParseMove {
                position: idx,
                reason: format!("column must be 0-{}", WIDTH - 1),
            });
        }
        moves.push((side, column as usize));
        idx += 1;
    }
    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WINNER;

    #[test]
    fn empty_state_has_zero_utility() {
        let state = State::new();
        assert_eq!(state.utility(), 0);
        assert!(!state.is_terminal());
        assert_eq!(state.side_to_move(), Side::Max);
    }

    #[test]
    fn successor_adds_exactly_one_piece() {
        let state = State::from_moves("X3O3X2").unwrap();
        for col in 0..WIDTH {
            let next = state.successor(col, Side::Min).unwrap();
            for other in 0..WIDTH {
                let expected = state.column_height(other) + usize::from(other == col);
                assert_eq!(next.column_height(other), expected);
            }
            let row = state.column_height(col);
            assert_eq!(next.piece_at(col, row), Cell::Min);
            assert_eq!(state.played_column(&next), Some(col));
            assert_eq!(next.utility(), evaluate(next.grid()));
        }
        // The parent is untouched.
        assert_eq!(state, State::from_moves("X3O3X2").unwrap());
    }

    #[test]
    fn full_column_has_no_successor() {
        for col in 0..WIDTH {
            let mut state = State::new();
            for i in 0..HEIGHT {
                let side = if i % 2 == 0 { Side::Max } else { Side::Min };
                state = state.successor(col, side).unwrap();
            }
            assert!(state.successor(col, Side::Max).is_none());
            assert!(state.successor(col, Side::Min).is_none());
            assert_eq!(state.play(col, Side::Max), Err(GameError::ColumnFull { column: col }));
        }
    }

    #[test]
    fn four_in_a_row_is_terminal() {
        let max = State::from_moves("X0O0X1O1X2O2X3").unwrap();
        assert_eq!(max.utility(), WINNER);
        assert!(max.is_terminal());

        let min = State::from_moves("X0O6X1O6X0O6X1O6").unwrap();
        assert_eq!(min.utility(), -WINNER);
        assert!(min.is_terminal());
    }

    #[test]
    fn drawn_full_board_is_terminal() {
        // Column c holds pairs XXOOXX or OOXXOO: no line of four anywhere.
        let mut state = State::new();
        for col in 0..WIDTH {
            for row in 0..HEIGHT {
                let side = if (col + row / 2) % 2 == 0 { Side::Max } else { Side::Min };
                state = state.successor(col, side).unwrap();
            }
        }
        assert!(state.is_full());
        assert!(state.utility().abs() < WINNER);
        assert!(state.is_terminal());
    }

    #[test]
    fn open_position_is_not_terminal() {
        let state = State::from_moves("X0X1X2O3O4O5").unwrap();
        assert!(state.utility().abs() < WINNER);
        assert!(!state.is_terminal());
        assert_eq!(state.side_to_move(), Side::Max);
    }

    #[test]
    fn copy_preserves_grid_and_utility() {
        let state = State::from_moves("X3O4X3").unwrap();
        let copy = State::from_position(&state);
        assert_eq!(copy, state);
        assert_eq!(copy.to_string(), state.to_string());
        assert_eq!(copy.side_to_move(), Side::Min);
    }

    #[test]
    fn parses_move_history() {
        let state = State::from_moves("x3 o3 X4").unwrap();
        assert_eq!(state.piece_at(3, 0), Cell::Max);
        assert_eq!(state.piece_at(3, 1), Cell::Min);
        assert_eq!(state.piece_at(4, 0), Cell::Max);
    }

    #[test]
    fn rejects_bad_histories() {
        assert!(matches!(
            State::from_moves("R3"),
            Err(GameError::ParseMove { position: 0, .. })
        ));
        assert!(matches!(
            State::from_moves("X3O"),
            Err(GameError::ParseMove { position: 3, .. })
        ));
        assert!(matches!(
            State::from_moves("XO"),
            Err(GameError::ParseMove { position: 1, .. })
        ));
        assert!(matches!(
            State::from_moves("X7"),
            Err(GameError::ParseMove { position: 1, .. })
        ));
        assert!(matches!(
            State::from_moves("X3O9"),
            Err(GameError::ParseMove { position: 3, .. })
        ));
        assert_eq!(
            State::from_moves("X0X0X0O0O0O0X0"),
            Err(GameError::ColumnFull { column: 0 })
        );
    }

    #[test]
    fn play_checks_column_bounds() {
        assert_eq!(
            State::new().play(WIDTH, Side::Max),
            Err(GameError::ColumnOutOfBounds { column: WIDTH })
        );
    }

    #[test]
    fn played_column_rejects_unrelated_states() {
        let state = State::from_moves("X3").unwrap();
        let two_ahead = State::from_moves("X3O3X3").unwrap();
        assert_eq!(state.played_column(&two_ahead), None);
        assert_eq!(state.played_column(&state), None);
    }
}
