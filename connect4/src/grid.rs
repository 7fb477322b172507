use std::fmt;

use crate::eval::Occupancy;
use crate::{HEIGHT, MAX_CELLS, WIDTH};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Max,
    Min,
}

/// 7x6 grid stored column-major: cell `(col, row)` lives at
/// `col * HEIGHT + row`, row 0 at the bottom.
///
/// Pieces only enter through [`Grid::drop_piece`], so every column is a
/// contiguous stack starting at row 0 and `heights` always matches it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Grid {
    cells: [Cell; MAX_CELLS],
    heights: [u8; WIDTH],
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; MAX_CELLS],
            heights: [0; WIDTH],
        }
    }

    pub fn piece_at(&self, col: usize, row: usize) -> Cell {
        assert!(
            col < WIDTH && row < HEIGHT,
            "cell ({col}, {row}) is outside the {WIDTH}x{HEIGHT} grid"
        );
        self.cells[col * HEIGHT + row]
    }

    pub fn column_height(&self, col: usize) -> usize {
        assert!(col < WIDTH, "column {col} is outside the grid");
        self.heights[col] as usize
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&h| h as usize == HEIGHT)
    }

    /// Stacks `cell` on top of `col` and returns the row it landed on, or
    /// `None` if the column is full.
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Option<usize> {
        debug_assert!(cell != Cell::Empty, "cannot drop an empty cell");
        let row = self.column_height(col);
        if row >= HEIGHT {
            return None;
        }
        self.cells[col * HEIGHT + row] = cell;
        self.heights[col] += 1;
        Some(row)
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Occupancy for Grid {
    fn cell(&self, col: usize, row: usize) -> Cell {
        self.piece_at(col, row)
    }
}

/// Top row first, one three-character field per cell.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..HEIGHT).rev() {
            for col in 0..WIDTH {
                let mark = match self.piece_at(col, row) {
                    Cell::Empty => "",
                    Cell::Max => "X",
                    Cell::Min => "O",
                };
                write!(f, "{mark:>3}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
