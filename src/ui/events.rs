use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use super::app::App;
use crate::fretboard::Mode;

/// Handle keyboard events and update app state
pub fn handle_events(app: &mut App) -> anyhow::Result<()> {
    // Poll for events with timeout
    if event::poll(Duration::from_millis(50))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key_event(app, key);
            }
        }
    }
    Ok(())
}

/// Process individual key press
fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
        app.quit();
        return;
    }

    // Any key closes the help overlay
    if app.show_help {
        app.toggle_help();
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // 0 = automatic, 1-5 = positions I-V
        KeyCode::Char(c @ '0'..='5') => {
            let selector = c as u8 - b'0';
            app.set_mode(Mode::from_selector(selector));
        }

        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => app.shift_octave(1),
        KeyCode::Char('-') | KeyCode::Down => app.shift_octave(-1),

        KeyCode::Char('c') => app.clear(),
        KeyCode::Char('?') | KeyCode::Char('h') => app.toggle_help(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fretboard::{Position, Resolver};

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_number_keys_select_mode() {
        let mut app = App::new(Resolver::default(), Mode::Automatic, 0, String::new());
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.mode, Mode::Fixed(Position::III));
        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.mode, Mode::Automatic);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = App::new(Resolver::default(), Mode::Automatic, 0, String::new());
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = App::new(Resolver::default(), Mode::Automatic, 0, String::new());
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
