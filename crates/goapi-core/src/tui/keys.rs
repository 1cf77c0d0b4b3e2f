//! Key event decoding for the wizard

use crate::wizard::{Input, Step};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Translate a key press into wizard input
///
/// Letters are text on text-entry steps; elsewhere `q` quits and `j`/`k`
/// move the selection.
pub fn map_key(key: KeyEvent, step: Step) -> Option<Input> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Input::Quit),
            _ => None,
        };
    }

    let input = match key.code {
        KeyCode::Enter => Input::Confirm,
        KeyCode::Esc => Input::Back,
        KeyCode::Up => Input::Up,
        KeyCode::Down => Input::Down,
        KeyCode::Left => Input::Left,
        KeyCode::Right => Input::Right,
        KeyCode::Home => Input::Home,
        KeyCode::End => Input::End,
        KeyCode::Backspace => Input::Backspace,
        KeyCode::Delete => Input::Delete,
        KeyCode::Char(c) if step.is_text_entry() => Input::Char(c),
        KeyCode::Char('q') => Input::Quit,
        KeyCode::Char('k') => Input::Up,
        KeyCode::Char('j') => Input::Down,
        KeyCode::Char(c) => Input::Char(c),
        _ => return None,
    };
    Some(input)
}
