use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Reload the snapshot, bin calendar, and service list from the backend.
    Refresh,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Char, Down, Left, Right, Tab, Up};

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }

    match key.code {
        Tab => {
            app.screen = app.screen.next();
            return Action::None;
        }
        Char('r') => return Action::Refresh,
        Char('1') => {
            app.screen = Screen::Dashboard;
            return Action::None;
        }
        Char('2') => {
            app.screen = Screen::Calendar;
            return Action::None;
        }
        Char('3') => {
            app.screen = Screen::Services;
            return Action::None;
        }
        _ => {}
    }

    match app.screen {
        Screen::Dashboard => {}

        Screen::Calendar => match key.code {
            Left | Char('h') => app.previous_day(),
            Right | Char('l') => app.next_day(),
            _ => {}
        },

        Screen::Services => match key.code {
            Up | Char('k') => {
                if app.service_index > 0 {
                    app.service_index -= 1;
                }
            }
            Down | Char('j') => {
                if app.service_index + 1 < app.services.len() {
                    app.service_index += 1;
                }
            }
            _ => {}
        },
    }

    Action::None
}
