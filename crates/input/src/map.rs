//! Key mapping from terminal events to input commands.

use crate::types::{GameAction, InputCommand, ANSWER_OPTIONS};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to a command.
///
/// Key releases are ignored so terminals with the kitty protocol enabled do
/// not double every press.
pub fn handle_key_event(key: KeyEvent) -> Option<InputCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if should_quit(key) {
        return Some(InputCommand::Quit);
    }

    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(InputCommand::Action(GameAction::MoveLeft))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(InputCommand::Action(GameAction::MoveRight))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(InputCommand::Action(GameAction::SoftDrop))
        }

        // Rotation (clockwise only)
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(InputCommand::Action(GameAction::Rotate)),

        KeyCode::Char(' ') => Some(InputCommand::Action(GameAction::HardDrop)),

        // Quiz answers
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            (index < ANSWER_OPTIONS).then_some(InputCommand::SelectAnswer(index))
        }
        KeyCode::Enter => Some(InputCommand::Confirm),

        // Session
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(InputCommand::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(InputCommand::Restart),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(InputCommand::RecordScore),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
