//! Static evaluation: counts the four-cell windows each side can still
//! complete and nets them into a single score.
use once_cell::sync::Lazy;

use crate::grid::Cell;
use crate::{HEIGHT, WIDTH, WINNER};

/// Window cells as `(col, row)` pairs.
pub type Window = [(usize, usize); 4];

/// Total number of four-cell windows on the board.
pub const WINDOW_COUNT: usize = 69;

/// Precomputed windows, one table per orientation, in `Orientation::ALL` order.
static WINDOWS: Lazy<[Vec<Window>; 4]> = Lazy::new(|| Orientation::ALL.map(generate_windows));

/// Anything the evaluator can read cells from.
pub trait Occupancy {
    fn cell(&self, col: usize, row: usize) -> Cell;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Orientation {
    Horizontal,
    Vertical,
    /// Rising towards lower columns.
    DiagonalLeft,
    /// Rising towards higher columns.
    DiagonalRight,
}

impl Orientation {
    /// Evaluation order. When several orientations hold a completed line,
    /// the first one in this order decides the utility.
    pub const ALL: [Orientation; 4] = [
        Orientation::Horizontal,
        Orientation::Vertical,
        Orientation::DiagonalLeft,
        Orientation::DiagonalRight,
    ];

    /// Inclusive ranges of starting columns and rows, and the step between
    /// consecutive cells of a window.
    fn geometry(self) -> ((usize, usize), (usize, usize), (isize, isize)) {
        match self {
            Orientation::Horizontal => ((0, WIDTH - 4), (0, HEIGHT - 1), (1, 0)),
            Orientation::Vertical => ((0, WIDTH - 1), (0, HEIGHT - 4), (0, 1)),
            Orientation::DiagonalLeft => ((3, WIDTH - 1), (0, HEIGHT - 4), (-1, 1)),
            Orientation::DiagonalRight => ((0, WIDTH - 4), (0, HEIGHT - 4), (1, 1)),
        }
    }

    pub fn windows(self) -> &'static [Window] {
        &WINDOWS[self as usize]
    }
}

fn generate_windows(orientation: Orientation) -> Vec<Window> {
    let ((x0, x1), (y0, y1), (dx, dy)) = orientation.geometry();
    let mut windows = Vec::new();
    for x in x0..=x1 {
        for y in y0..=y1 {
            let mut window = [(0, 0); 4];
            for (i, cell) in window.iter_mut().enumerate() {
                let i = i as isize;
                *cell = (
                    (x as isize + dx * i) as usize,
                    (y as isize + dy * i) as usize,
                );
            }
            windows.push(window);
        }
    }
    windows
}

/// Net score of one orientation: +1 per window Max can still fill, -1 per
/// window Min can still fill, or exactly `WINNER` / `-WINNER` as soon as a
/// window is complete. An empty window counts for both sides.
pub fn orientation_score<B: Occupancy + ?Sized>(board: &B, orientation: Orientation) -> i32 {
    let mut score = 0;
    for window in orientation.windows() {
        let mut open_for_min = true;
        let mut open_for_max = true;
        let mut complete = true;
        for &(col, row) in window {
            match board.cell(col, row) {
                Cell::Max => open_for_min = false,
                Cell::Min => open_for_max = false,
                Cell::Empty => complete = false,
            }
        }

        if open_for_min && complete {
            return -WINNER;
        } else if open_for_min {
            score -= 1;
        }

        if open_for_max && complete {
            return WINNER;
        } else if open_for_max {
            score += 1;
        }
    }
    score
}

/// Utility of a board: the first decided orientation wins outright,
/// otherwise the four net scores are summed.
pub fn evaluate<B: Occupancy + ?Sized>(board: &B) -> i32 {
    let scores = Orientation::ALL.map(|orientation| orientation_score(board, orientation));
    scores
        .iter()
        .copied()
        .find(|score| score.abs() == WINNER)
        .unwrap_or_else(|| scores.iter().sum())
}
