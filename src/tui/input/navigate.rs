use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::DisplayRow;
use crate::tui::app::{
    App, ColumnScreenState, ConfirmAction, ConfirmState, Mode, PromptAction, PromptState,
};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Clear any transient status message on keypress
    app.clear_status();

    match (key.modifiers, key.code) {
        (m, KeyCode::Char('t')) if m.contains(KeyModifiers::CONTROL) => app.cycle_theme(),

        // Cursor movement
        (KeyModifiers::NONE, KeyCode::Char('j')) | (_, KeyCode::Down) => app.move_cursor(1),
        (KeyModifiers::NONE, KeyCode::Char('k')) | (_, KeyCode::Up) => app.move_cursor(-1),
        (KeyModifiers::NONE, KeyCode::Char('g')) | (_, KeyCode::Home) => app.set_cursor(0),
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => app.set_cursor(usize::MAX),
        (_, KeyCode::PageDown) => app.move_cursor(10),
        (_, KeyCode::PageUp) => app.move_cursor(-10),

        (_, KeyCode::Enter) => toggle_project(app),
        (_, KeyCode::Esc) => {
            if app.state.has_filters() {
                app.state.clear_filters();
                app.persist_ui_state();
                app.refresh();
            }
        }

        (KeyModifiers::NONE, KeyCode::Char('d')) => {
            if let Some(task) = app.selected_task() {
                let question = format!("mark \"{}\" done?", task.description);
                let uuid = task.uuid.clone();
                open_confirm(app, question, ConfirmAction::MarkDone { uuid });
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('t')) => {
            if let Some(uuid) = selected_uuid(app) {
                open_prompt(app, "tags", "", PromptAction::AddTags { uuid });
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('a')) => {
            let default = match app.selected_row().map(DisplayRow::project) {
                Some(project) if !project.is_empty() => format!("project:{} ", project),
                _ => String::new(),
            };
            open_prompt(app, "add", default, PromptAction::AddTask);
        }
        (_, KeyCode::Char('A')) => {
            if let Some(uuid) = selected_uuid(app) {
                open_prompt(app, "annotate", "", PromptAction::Annotate { uuid });
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('p')) => {
            if let Some(task) = app.selected_task() {
                let default = format!("project:{}", task.project);
                let uuid = task.uuid.clone();
                open_prompt(app, "modify", default, PromptAction::Modify { uuid });
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('m')) => {
            if let Some(uuid) = selected_uuid(app) {
                open_prompt(app, "modify", "", PromptAction::Modify { uuid });
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('e')) => {
            app.pending_edit = selected_uuid(app);
        }
        (KeyModifiers::NONE, KeyCode::Char('b')) => {
            if let Some(task) = app.selected_task() {
                let uuid = task.uuid.clone();
                if task.is_active() {
                    app.run_backend(|b| b.stop(&uuid));
                } else {
                    app.run_backend(|b| b.start(&uuid));
                }
            }
        }

        // Filters
        (_, KeyCode::Char('P')) => {
            if let Some(task) = app.selected_task()
                && task.has_project()
            {
                let project = task.project.clone();
                app.state.set_project_filter(&project);
                app.persist_ui_state();
                app.refresh();
            }
        }
        (_, KeyCode::Char('T')) => {
            // Project rows carry no tags and leave the filter alone
            if let Some(task) = app.selected_task() {
                let tags = task.tags.join(",");
                app.state.set_tag_filter(&tags);
                app.persist_ui_state();
                app.refresh();
            }
        }

        (KeyModifiers::NONE, KeyCode::Char('l')) => {
            app.columns_screen = Some(ColumnScreenState {
                layout: app.config.columns.clone(),
                cursor: 0,
                move_mode: false,
            });
            app.mode = Mode::Columns;
        }

        (KeyModifiers::NONE, KeyCode::Char('h')) | (_, KeyCode::Char('?')) => {
            app.show_help = !app.show_help;
        }
        (KeyModifiers::NONE, KeyCode::Char('q')) => {
            open_confirm(app, "quit?".to_string(), ConfirmAction::Quit);
        }
        _ => {}
    }
}

fn selected_uuid(app: &App) -> Option<String> {
    app.selected_task().map(|t| t.uuid.clone())
}

/// Expand the project under the cursor, or collapse it and its descendants
fn toggle_project(app: &mut App) {
    let Some(DisplayRow::Project(row)) = app.selected_row() else {
        return;
    };
    let path = row.path.clone();
    app.state.toggle_expanded(&path);
    app.persist_ui_state();
    app.refresh();
}

fn open_prompt(
    app: &mut App,
    label: &'static str,
    default: impl Into<String>,
    action: PromptAction,
) {
    app.prompt = Some(PromptState::new(label, default, action));
    app.mode = Mode::Prompt;
}

fn open_confirm(app: &mut App, question: String, action: ConfirmAction) {
    app.confirm = Some(ConfirmState { question, action });
    app.mode = Mode::Confirm;
}
