use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            let state = app.confirm.take();
            app.mode = Mode::Navigate;
            if let Some(state) = state {
                match state.action {
                    ConfirmAction::MarkDone { uuid } => confirm_mark_done(app, &uuid),
                    ConfirmAction::Quit => app.should_quit = true,
                }
            }
        }
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.confirm = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

/// Complete the task, then land on the row above it
pub(super) fn confirm_mark_done(app: &mut App, uuid: &str) {
    match app.backend.mark_done(uuid) {
        Ok(()) => {
            app.move_cursor(-1);
            app.refresh();
        }
        Err(e) => app.show_error(e.to_string()),
    }
}
