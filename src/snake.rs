use crate::grid::{Board, Cell, Direction};
use MoveResult::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// `old_tail` is None when the snake ate and grew this step.
    Moved { new_head: Cell, old_tail: Option<Cell> },
    Crashed(Collision),
}

/// Body cells run from the tail (first) to the head (last).
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Cell>,
    direction: Direction,
}

impl Snake {
    pub fn new(body: Vec<Cell>, direction: Direction) -> Self {
        debug_assert!(!body.is_empty());
        Snake { body, direction }
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Ignores requests that would turn the snake back onto itself.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction.is_opposite(self.direction) {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Advances one cell, growing instead of dropping the tail when the new
    /// head lands on `food`. A crash leaves the body untouched.
    pub fn move_step(&mut self, board: &Board, food: Cell) -> MoveResult {
        let new_head = self.head().step(self.direction, board.cell_size());

        if !board.contains(new_head) {
            return Crashed(Collision::Wall);
        }

        // Checked against the whole body, including the tail cell about to be vacated
        if self.body.contains(&new_head) {
            return Crashed(Collision::Body);
        }

        let old_tail = if new_head == food {
            None
        } else {
            self.body.drain(0..1).next()
        };

        self.body.push(new_head);
        Moved { new_head, old_tail }
    }
}
