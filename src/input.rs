use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::grid::Direction::{self, *};

/// Arrow keys and WASD, any case.
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Right),
        _ => None,
    }
}

pub fn is_quit(ev: &KeyEvent) -> bool {
    match ev {
        KeyEvent { code: KeyCode::Char('c'), modifiers } => modifiers.contains(KeyModifiers::CONTROL),
        KeyEvent { code: KeyCode::Char('q'), .. } | KeyEvent { code: KeyCode::Char('Q'), .. } => true,
        _ => false,
    }
}
