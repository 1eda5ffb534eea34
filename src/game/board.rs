//! Perimeter board geometry.
//!
//! Squares are numbered from 1 at the top-left corner, running right along the
//! top edge, down the right edge, left along the bottom edge and up the left
//! edge, stopping one square short of the start.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("a perimeter board needs at least 2x2 cells, got {width}x{height}")]
    Dimensions { width: usize, height: usize },
    #[error("square {square} is outside 1..={total}")]
    OutOfRange { square: usize, total: usize },
}

/// Grid cell, 0-based, row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquareKind {
    Go,
    Corner,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width < 2 || height < 2 {
            return Err(BoardError::Dimensions { width, height });
        }
        Ok(Board { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn total_squares(&self) -> usize {
        2 * self.width + 2 * (self.height - 2)
    }

    /// Squares that sit on the top-right, bottom-right and bottom-left corners.
    fn corners(&self) -> [usize; 3] {
        let top_right = self.width;
        let bottom_right = top_right + self.height - 1;
        let bottom_left = bottom_right + self.width - 1;
        [top_right, bottom_right, bottom_left]
    }

    pub fn square_to_cell(&self, square: usize) -> Result<Cell, BoardError> {
        let total = self.total_squares();
        if square < 1 || square > total {
            return Err(BoardError::OutOfRange { square, total });
        }
        let (w, h) = (self.width, self.height);
        let [top_right, bottom_right, bottom_left] = self.corners();

        let cell = if square <= top_right {
            Cell { row: 0, col: square - 1 }
        } else if square <= bottom_right {
            Cell { row: square - top_right, col: w - 1 }
        } else if square <= bottom_left {
            Cell { row: h - 1, col: w - 1 - (square - bottom_right) }
        } else {
            Cell { row: h - 1 - (square - bottom_left), col: 0 }
        };
        Ok(cell)
    }

    pub fn square_kind(&self, square: usize) -> SquareKind {
        if square == 1 {
            SquareKind::Go
        } else if self.corners().contains(&square) {
            SquareKind::Corner
        } else {
            SquareKind::Plain
        }
    }

    /// Every square with its cell, in board order.
    pub fn squares(&self) -> impl Iterator<Item = (usize, Cell)> + '_ {
        (1..=self.total_squares()).filter_map(|square| {
            self.square_to_cell(square).ok().map(|cell| (square, cell))
        })
    }
}

/// Free-function form of [`Board::square_to_cell`].
pub fn square_to_cell(square: usize, width: usize, height: usize) -> Result<Cell, BoardError> {
    Board::new(width, height)?.square_to_cell(square)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn standard() -> Board {
        Board::new(15, 5).unwrap()
    }

    #[test]
    fn test_standard_board_has_36_squares() {
        assert_eq!(standard().total_squares(), 36);
    }

    #[test]
    fn test_edges_and_corners() {
        let board = standard();
        assert_eq!(board.square_to_cell(1), Ok(Cell { row: 0, col: 0 }));
        assert_eq!(board.square_to_cell(15), Ok(Cell { row: 0, col: 14 }));
        assert_eq!(board.square_to_cell(16), Ok(Cell { row: 1, col: 14 }));
        assert_eq!(board.square_to_cell(19), Ok(Cell { row: 4, col: 14 }));
        assert_eq!(board.square_to_cell(20), Ok(Cell { row: 4, col: 13 }));
        assert_eq!(board.square_to_cell(33), Ok(Cell { row: 4, col: 0 }));
        assert_eq!(board.square_to_cell(34), Ok(Cell { row: 3, col: 0 }));
        assert_eq!(board.square_to_cell(36), Ok(Cell { row: 1, col: 0 }));
    }

    #[test]
    fn test_every_square_is_a_distinct_perimeter_cell() {
        let board = standard();
        let cells: HashSet<Cell> = board.squares().map(|(_, cell)| cell).collect();
        assert_eq!(cells.len(), 36);
        for cell in cells {
            let on_edge = cell.row == 0 || cell.row == 4 || cell.col == 0 || cell.col == 14;
            assert!(on_edge, "{cell:?} is not on the perimeter");
        }
    }

    #[test]
    fn test_out_of_range_squares_are_errors() {
        let board = standard();
        assert_eq!(board.square_to_cell(0), Err(BoardError::OutOfRange { square: 0, total: 36 }));
        assert_eq!(board.square_to_cell(37), Err(BoardError::OutOfRange { square: 37, total: 36 }));
    }

    #[test]
    fn test_two_row_board_has_no_left_column() {
        let board = Board::new(4, 2).unwrap();
        assert_eq!(board.total_squares(), 8);
        assert_eq!(board.square_to_cell(5), Ok(Cell { row: 1, col: 3 }));
        assert_eq!(board.square_to_cell(8), Ok(Cell { row: 1, col: 0 }));
    }

    #[test]
    fn test_degenerate_dimensions_are_rejected() {
        assert!(Board::new(1, 5).is_err());
        assert!(square_to_cell(1, 15, 1).is_err());
    }

    #[test]
    fn test_square_kinds() {
        let board = standard();
        assert_eq!(board.square_kind(1), SquareKind::Go);
        assert_eq!(board.square_kind(15), SquareKind::Corner);
        assert_eq!(board.square_kind(19), SquareKind::Corner);
        assert_eq!(board.square_kind(33), SquareKind::Corner);
        assert_eq!(board.square_kind(2), SquareKind::Plain);
    }
}
