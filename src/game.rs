use std::time::{Duration, Instant};

use anyhow::Result;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::input::is_quit;
use crate::snake::MoveResult::{self, Moved};
use crate::state::{EndReason, GameState, Status};
use crate::term::{Glyph, TermManager, MESSAGE_LINES, MESSAGE_WIDTH};

const INTRO: [&str; 4] = [
    "Arrow keys or WASD to move",
    "q or CTRL+C to quit",
    "",
    "Press any key to begin",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    PlayAgain,
    Quit,
}

/// Drives sessions on the terminal: one timer, one input queue, one state.
pub struct SnakeGame {
    config: GameConfig,
    term: TermManager,
    rng: StdRng,
}

impl SnakeGame {
    pub fn new(config: GameConfig) -> Result<Self> {
        let term = TermManager::new(config.board())?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(SnakeGame { config, term, rng })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()?;
        self.term.reset()?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore()?;
        Ok(())
    }

    pub fn show_intro(&mut self) -> Result<Flow> {
        self.term.show_message(&INTRO)?;

        if is_quit(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        Ok(Flow::PlayAgain)
    }

    pub fn play(&mut self) -> Result<Flow> {
        let mut state = GameState::new(self.config.board(), StdRng::from_rng(&mut self.rng)?);

        self.term.reset()?;
        self.print_state(&state)?;

        let mut next_tick = Instant::now() + self.config.tick_interval;

        while !state.is_over() {
            for key_ev in self.term.read_key_events_until(next_tick)? {
                if is_quit(&key_ev) {
                    return Ok(Flow::Quit);
                }
                state.on_direction_key(key_ev.code);
            }

            if Instant::now() < next_tick {
                continue;
            }
            next_tick = next_deadline(next_tick, Instant::now(), self.config.tick_interval);

            if let Some(res) = state.tick() {
                self.print_update(&state, &res)?;
            }
        }

        // No more ticks once the game is over
        self.game_over(&state)?;

        if is_quit(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }

        info!("Restarting");
        Ok(Flow::PlayAgain)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_over(&mut self, state: &GameState) -> Result<()> {
        info!(
            "{:?} with head at {:?} heading {:?}, score {}",
            state.status(),
            state.head(),
            state.direction(),
            state.score()
        );

        let glyph = body_glyph(state.status());
        for pos in state.body() {
            self.term.draw(*pos, glyph)?;
        }

        let lines = end_message(state.status(), state.score());
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        self.term.show_message(&lines)?;
        Ok(())
    }

    fn print_state(&mut self, state: &GameState) -> Result<()> {
        for pos in state.body() {
            self.term.draw(*pos, Glyph::Snake)?;
        }

        self.term.draw(state.food(), Glyph::Food)?;
        self.term.draw_score(state.score())?;
        self.term.flush()?;
        Ok(())
    }

    fn print_update(&mut self, state: &GameState, mov: &MoveResult) -> Result<()> {
        if let Moved { new_head, old_tail } = mov {
            self.term.draw(*new_head, Glyph::Snake)?;

            match old_tail {
                Some(old_tail_pos) => self.term.draw(*old_tail_pos, Glyph::Empty)?,
                None if !state.is_over() => {
                    self.term.draw(state.food(), Glyph::Food)?;
                    self.term.draw_score(state.score())?;
                }
                None => self.term.draw_score(state.score())?,
            }

            self.term.flush()?;
        }
        Ok(())
    }
}

/// Keeps a steady cadence, but starts over after a stall instead of
/// firing the missed ticks back to back.
fn next_deadline(deadline: Instant, now: Instant, interval: Duration) -> Instant {
    let next = deadline + interval;
    if next <= now {
        now + interval
    } else {
        next
    }
}

/// Only a crash kills the snake; filling the board leaves it alive.
fn body_glyph(status: Status) -> Glyph {
    match status {
        Status::Over(EndReason::Collision(_)) => Glyph::DeadSnake,
        _ => Glyph::Snake,
    }
}

fn end_message(status: Status, score: u32) -> Vec<String> {
    let headline = match status {
        Status::Over(EndReason::BoardFull) => "You won!",
        _ => "Game over!",
    };

    vec![
        headline.to_string(),
        format!("Score: {}", score),
        String::new(),
        "Press any key to play again,".to_string(),
        "or q / CTRL+C to quit.".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Collision;

    const INTERVAL: Duration = Duration::from_millis(300);

    #[test]
    fn ticks_keep_their_cadence() {
        let start = Instant::now();
        let deadline = start + INTERVAL;

        assert_eq!(next_deadline(deadline, deadline, INTERVAL), deadline + INTERVAL);

        let a_bit_late = deadline + Duration::from_millis(120);
        assert_eq!(next_deadline(deadline, a_bit_late, INTERVAL), deadline + INTERVAL);
    }

    #[test]
    fn stalled_timer_does_not_burst() {
        let start = Instant::now();
        let deadline = start + INTERVAL;
        let stalled = deadline + INTERVAL * 3;

        let next = next_deadline(deadline, stalled, INTERVAL);

        assert_eq!(next, stalled + INTERVAL);
        assert!(next > stalled);
    }

    #[test]
    fn only_crashes_mark_the_snake_dead() {
        assert_eq!(body_glyph(Status::Over(EndReason::Collision(Collision::Wall))), Glyph::DeadSnake);
        assert_eq!(body_glyph(Status::Over(EndReason::Collision(Collision::Body))), Glyph::DeadSnake);
        assert_eq!(body_glyph(Status::Over(EndReason::BoardFull)), Glyph::Snake);
    }

    #[test]
    fn end_message_headline() {
        let crash = end_message(Status::Over(EndReason::Collision(Collision::Wall)), 3);
        assert_eq!(crash[0], "Game over!");
        assert_eq!(crash[1], "Score: 3");

        let win = end_message(Status::Over(EndReason::BoardFull), 398);
        assert_eq!(win[0], "You won!");
    }

    #[test]
    fn messages_fit_the_reserved_area() {
        let end = end_message(Status::Over(EndReason::BoardFull), u32::MAX);
        let end: Vec<&str> = end.iter().map(String::as_str).collect();

        for lines in &[&INTRO[..], &end[..]] {
            assert!(lines.len() as u16 <= MESSAGE_LINES);
            for line in lines.iter() {
                assert!(line.chars().count() as u16 <= MESSAGE_WIDTH, "{:?} is too wide", line);
            }
        }
    }
}
