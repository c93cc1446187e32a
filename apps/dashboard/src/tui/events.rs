use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use super::Action;

/// Map a terminal event to a dashboard action
pub fn action_for(event: &Event) -> Option<Action> {
    let Event::Key(key) = event else {
        return None;
    };

    // Only process key press events, ignore releases and repeats
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::RefreshNow),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState};

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn quit_keys() {
        assert_eq!(action_for(&press(KeyCode::Char('q'), KeyModifiers::NONE)), Some(Action::Quit));
        assert_eq!(action_for(&press(KeyCode::Char('Q'), KeyModifiers::SHIFT)), Some(Action::Quit));
        assert_eq!(action_for(&press(KeyCode::Esc, KeyModifiers::NONE)), Some(Action::Quit));
        assert_eq!(action_for(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(Action::Quit));
    }

    #[test]
    fn refresh_key() {
        assert_eq!(action_for(&press(KeyCode::Char('r'), KeyModifiers::NONE)), Some(Action::RefreshNow));
    }

    #[test]
    fn other_input_is_ignored() {
        assert_eq!(action_for(&press(KeyCode::Char('x'), KeyModifiers::NONE)), None);
        assert_eq!(action_for(&Event::FocusGained), None);

        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(action_for(&release), None);
    }
}
