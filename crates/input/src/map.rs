//! Key mapping from terminal events to device input events.

use crate::types::InputEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key press to an input event. Releases and unmapped keys give None.
pub fn handle_key_event(key: KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        // Joystick
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => Some(InputEvent::Up),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(InputEvent::Down),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => Some(InputEvent::Left),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => Some(InputEvent::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Some(InputEvent::Center),

        // Buttons
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('x') | KeyCode::Char('X') => {
            Some(InputEvent::ButtonA)
        }
        KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => {
            Some(InputEvent::ButtonB)
        }

        _ => None,
    }
}

/// Check if key should quit the program.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    #[test]
    fn test_joystick_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(InputEvent::Left)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Right)),
            Some(InputEvent::Right)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('j'))),
            Some(InputEvent::Down)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('K'))),
            Some(InputEvent::Up)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Enter)),
            Some(InputEvent::Center)
        );
    }

    #[test]
    fn test_button_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('a'))),
            Some(InputEvent::ButtonA)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('X'))),
            Some(InputEvent::ButtonA)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Esc)),
            Some(InputEvent::ButtonB)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('p'))),
            Some(InputEvent::ButtonB)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(handle_key_event(release), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
