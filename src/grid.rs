use crate::config::CELL_SIZE;
use Direction::*;

/// A grid-aligned position on the board, in board units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn step(self, direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx * cell_size, self.y + dy * cell_size)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Left, Right) | (Right, Left))
    }

    /// Unit vector, with y growing downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// Board geometry: `cols` x `rows` cells of `cell_size` units each.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Board {
    cols: u16,
    rows: u16,
    cell_size: i32,
}

impl Board {
    pub fn new(cols: u16, rows: u16) -> Self {
        Board { cols, rows, cell_size: CELL_SIZE }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn width(&self) -> i32 {
        self.cols as i32 * self.cell_size
    }

    pub fn height(&self) -> i32 {
        self.rows as i32 * self.cell_size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width() && cell.y >= 0 && cell.y < self.height()
    }

    /// Every cell of the board, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows as i32).flat_map(move |row| {
            (0..self.cols as i32).map(move |col| Cell::new(col * self.cell_size, row * self.cell_size))
        })
    }

    /// Column and row of a cell, or None if it is off the board.
    pub fn column_row(&self, cell: Cell) -> Option<(u16, u16)> {
        if !self.contains(cell) {
            return None;
        }

        Some(((cell.x / self.cell_size) as u16, (cell.y / self.cell_size) as u16))
    }

    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.column_row(cell)
            .map(|(col, row)| row as usize * self.cols as usize + col as usize)
    }

    pub fn len(&self) -> usize {
        self.cols as usize * self.rows as usize
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new(crate::config::BOARD_COLS, crate::config::BOARD_ROWS)
    }
}
