use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

pub(super) fn handle_columns(app: &mut App, key: KeyEvent) {
    let Some(screen) = app.columns_screen.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };
    let last = screen.layout.len().saturating_sub(1);

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) | (KeyModifiers::NONE, KeyCode::Char('q' | 'l')) => {
            close_columns(app)
        }
        (KeyModifiers::NONE, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            if screen.move_mode {
                screen.cursor = screen.layout.move_column(screen.cursor, 1);
            } else {
                screen.cursor = (screen.cursor + 1).min(last);
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            if screen.move_mode {
                screen.cursor = screen.layout.move_column(screen.cursor, -1);
            } else {
                screen.cursor = screen.cursor.saturating_sub(1);
            }
        }
        (KeyModifiers::NONE, KeyCode::Char(' ')) | (_, KeyCode::Enter) => {
            screen.layout.toggle_visible(screen.cursor);
        }
        (KeyModifiers::NONE, KeyCode::Char('m')) => {
            screen.move_mode = !screen.move_mode;
        }
        _ => {}
    }
}

/// Apply the edited layout, save it and rebuild the table
fn close_columns(app: &mut App) {
    app.mode = Mode::Navigate;
    let Some(screen) = app.columns_screen.take() else {
        return;
    };
    if screen.layout != app.config.columns {
        app.config.columns = screen.layout;
        app.save_layout();
    }
    app.refresh();
}
