use std::time::Duration;

use crossterm::style::Color;
use thiserror::Error;

use crate::grid::Board;

pub const CELL_SIZE: i32 = 20;
pub const BOARD_COLS: u16 = 20;
pub const BOARD_ROWS: u16 = 20;
pub const TICK_INTERVAL: Duration = Duration::from_millis(300);

const MIN_COLS: u16 = 3;
const MIN_ROWS: u16 = 1;
const MAX_SIDE: u16 = 100;

pub const SNAKE_COLOR: Color = Color::Rgb { r: 0x62, g: 0xa1, b: 0x50 };
pub const FOOD_COLOR: Color = Color::Rgb { r: 0xff, g: 0x00, b: 0x00 };
pub const GAME_OVER_COLOR: Color = Color::Rgb { r: 0xc7, g: 0x04, b: 0x04 };

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid board size {cols}x{rows}: need {min_cols}..={max} columns and {min_rows}..={max} rows")]
    InvalidBoard {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
        max: u16,
    },

    #[error("Terminal is {actual:?} but the board needs at least {needed:?} (columns, rows)")]
    TerminalTooSmall { needed: (u16, u16), actual: (u16, u16) },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub cols: u16,
    pub rows: u16,
    pub tick_interval: Duration,
    /// Seed for food placement, random when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            cols: BOARD_COLS,
            rows: BOARD_ROWS,
            tick_interval: TICK_INTERVAL,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(cols: u16, rows: u16) -> Result<Self, ConfigError> {
        // The starting body needs two columns and food needs a third free cell
        let fits = |side: u16, min: u16| (min..=MAX_SIDE).contains(&side);
        if !fits(cols, MIN_COLS) || !fits(rows, MIN_ROWS) {
            return Err(ConfigError::InvalidBoard {
                cols,
                rows,
                min_cols: MIN_COLS,
                min_rows: MIN_ROWS,
                max: MAX_SIDE,
            });
        }

        Ok(GameConfig { cols, rows, ..Default::default() })
    }

    pub fn with_seed(self, seed: Option<u64>) -> Self {
        GameConfig { seed, ..self }
    }

    pub fn board(&self) -> Board {
        Board::new(self.cols, self.rows)
    }
}
