use std::io::{stdout, Stdout, Write};
use std::time::Instant;

use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::style::{self, Color};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal, Result};

use crate::config::{ConfigError, FOOD_COLOR, GAME_OVER_COLOR, SNAKE_COLOR};
use crate::grid::{Board, Cell};

/// Terminal columns per board cell, so cells come out roughly square.
const CELL_WIDTH: u16 = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Glyph {
    Empty,
    Snake,
    DeadSnake,
    Food,
}

impl Glyph {
    fn text(self) -> &'static str {
        match self {
            Glyph::Empty => "  ",
            Glyph::Snake => "██",
            Glyph::DeadSnake => "XX",
            Glyph::Food => "()",
        }
    }

    fn color(self) -> Option<Color> {
        match self {
            Glyph::Empty => None,
            Glyph::Snake => Some(SNAKE_COLOR),
            Glyph::DeadSnake => Some(GAME_OVER_COLOR),
            Glyph::Food => Some(FOOD_COLOR),
        }
    }
}

/// Largest message any screen shows, in characters and lines.
pub const MESSAGE_WIDTH: u16 = 28;
pub const MESSAGE_LINES: u16 = 5;

/// Where the board, score line and messages sit on the terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Layout {
    board: Board,
    terminal: (u16, u16),
    /// Terminal position of the top-left board cell.
    origin: (u16, u16),
}

impl Layout {
    fn new(board: Board, terminal: (u16, u16)) -> std::result::Result<Self, ConfigError> {
        let frame = (board.cols() * CELL_WIDTH + 2, board.rows() + 3);
        let needed = (frame.0.max(MESSAGE_WIDTH + 2), frame.1.max(MESSAGE_LINES + 2));

        if terminal.0 < needed.0 || terminal.1 < needed.1 {
            return Err(ConfigError::TerminalTooSmall { needed, actual: terminal });
        }

        let origin = ((terminal.0 - frame.0) / 2 + 1, (terminal.1 - frame.1) / 2 + 1);
        Ok(Layout { board, terminal, origin })
    }

    fn top_left_corner(&self) -> (u16, u16) {
        (self.origin.0 - 1, self.origin.1 - 1)
    }

    fn bottom_border_row(&self) -> u16 {
        self.origin.1 + self.board.rows()
    }

    fn score_row(&self) -> u16 {
        self.bottom_border_row() + 1
    }

    fn cell_position(&self, cell: Cell) -> Option<(u16, u16)> {
        self.board
            .column_row(cell)
            .map(|(col, row)| (self.origin.0 + col * CELL_WIDTH, self.origin.1 + row))
    }

    /// Top-left of a `width` x `height` box centered on the board, kept on screen.
    fn message_position(&self, width: u16, height: u16) -> (u16, u16) {
        let center = (
            self.origin.0 + self.board.cols() * CELL_WIDTH / 2,
            self.origin.1 + self.board.rows() / 2,
        );
        let left = center.0.saturating_sub(width / 2).min(self.terminal.0.saturating_sub(width));
        let top = center.1.saturating_sub(height / 2).min(self.terminal.1.saturating_sub(height));
        (left, top)
    }
}

/// Owns the terminal and what is drawn on each board cell.
pub struct TermManager {
    board: Board,
    stdout: Stdout,
    layout: Layout,
    cells: Vec<Glyph>,
    has_message: bool,
}

impl TermManager {
    pub fn new(board: Board) -> anyhow::Result<Self> {
        let layout = Layout::new(board, terminal::size()?)?;

        Ok(TermManager {
            board,
            stdout: stdout(),
            layout,
            cells: vec![Glyph::Empty; board.len()],
            has_message: false,
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()
    }

    /// Undoes `setup`, including a setup that only got part way.
    pub fn restore(&mut self) -> Result<()> {
        let raw = terminal::disable_raw_mode();
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        raw
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Waits until `deadline` for key presses, returning whatever arrived.
    pub fn read_key_events_until(&self, deadline: Instant) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut timeout = deadline.saturating_duration_since(Instant::now());

        while poll(timeout)? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
            timeout = deadline.saturating_duration_since(Instant::now());
        }

        Ok(events)
    }

    /// Clears the screen and draws an empty board with its border.
    pub fn reset(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.cells.iter_mut().for_each(|g| *g = Glyph::Empty);
        self.has_message = false;
        self.draw_borders()?;
        self.flush()
    }

    pub fn draw(&mut self, cell: Cell, glyph: Glyph) -> Result<()> {
        if let Some(i) = self.board.index_of(cell) {
            self.cells[i] = glyph;
            self.print_cell(cell, glyph)?;
        }
        Ok(())
    }

    pub fn draw_score(&mut self, score: u32) -> Result<()> {
        let (x, _) = self.layout.top_left_corner();
        let row = self.layout.score_row();
        queue!(
            self.stdout,
            cursor::MoveTo(x, row),
            terminal::Clear(ClearType::CurrentLine),
            style::Print(format!("Score: {}", score))
        )
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message {
            self.hide_message()?;
        }

        let msg_height = lines.len() as u16 + 2;
        let msg_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 2;
        debug_assert!(msg_width <= MESSAGE_WIDTH + 2 && msg_height <= MESSAGE_LINES + 2);
        let (left, top) = self.layout.message_position(msg_width, msg_height);

        let blank = " ".repeat(msg_width as usize);
        queue!(self.stdout, cursor::MoveTo(left, top), style::Print(&blank))?;
        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{line: ^width$}", line = line, width = msg_width as usize);
            queue!(self.stdout, cursor::MoveTo(left, top + i as u16 + 1), style::Print(padded))?;
        }
        queue!(self.stdout, cursor::MoveTo(left, top + msg_height - 1), style::Print(&blank))?;

        self.has_message = true;
        self.flush()
    }

    /// Repaints the board from the cell buffer, wiping any message.
    pub fn hide_message(&mut self) -> Result<()> {
        if !self.has_message {
            return Ok(());
        }

        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.draw_borders()?;

        let board = self.board;
        for (cell, glyph) in board.cells().zip(self.cells.clone()) {
            self.print_cell(cell, glyph)?;
        }

        self.has_message = false;
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self) -> Result<()> {
        let (x0, y0) = self.layout.top_left_corner();
        let bottom = self.layout.bottom_border_row();
        let inner = (self.board.cols() * CELL_WIDTH) as usize;
        let edge = format!("+{}+", "-".repeat(inner));

        queue!(self.stdout, cursor::MoveTo(x0, y0), style::Print(&edge))?;
        for row in 1..=self.board.rows() {
            queue!(
                self.stdout,
                cursor::MoveTo(x0, y0 + row),
                style::Print('|'),
                cursor::MoveTo(x0 + inner as u16 + 1, y0 + row),
                style::Print('|')
            )?;
        }
        queue!(self.stdout, cursor::MoveTo(x0, bottom), style::Print(&edge))
    }

    fn print_cell(&mut self, cell: Cell, glyph: Glyph) -> Result<()> {
        let pos = match self.layout.cell_position(cell) {
            Some(pos) => pos,
            None => return Ok(()),
        };

        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1))?;
        match glyph.color() {
            Some(color) => queue!(
                self.stdout,
                style::SetForegroundColor(color),
                style::Print(glyph.text()),
                style::ResetColor
            ),
            None => queue!(self.stdout, style::Print(glyph.text())),
        }
    }
}
