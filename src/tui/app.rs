use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;

use crate::io::backend::{BackendError, TaskBackend, Taskwarrior};
use crate::io::config_io::{save_column_layout, save_theme};
use crate::io::state::{UiState, read_ui_state, state_path, write_ui_state};
use crate::model::{ColumnLayout, Config, DisplayRow, Task, View, ViewState};
use crate::ops::rebuild_view;

use super::input;
use super::render;
use super::theme::{Theme, next_theme_name};

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Single-line text input in the status row
    Prompt,
    /// y/n question in the status row
    Confirm,
    /// Column layout screen
    Columns,
}

/// What a submitted prompt does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    AddTags { uuid: String },
    AddTask,
    Annotate { uuid: String },
    Modify { uuid: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub label: &'static str,
    pub input: String,
    /// Byte offset into `input`
    pub cursor: usize,
    pub action: PromptAction,
}

impl PromptState {
    pub fn new(label: &'static str, input: impl Into<String>, action: PromptAction) -> Self {
        let input = input.into();
        PromptState {
            label,
            cursor: input.len(),
            input,
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    MarkDone { uuid: String },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub question: String,
    pub action: ConfirmAction,
}

/// Working copy of the layout while the column screen is open
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnScreenState {
    pub layout: ColumnLayout,
    pub cursor: usize,
    /// j/k move the selected column instead of the cursor
    pub move_mode: bool,
}

/// Main application state
pub struct App {
    pub backend: Box<dyn TaskBackend>,
    pub config: Config,
    /// Where config and state.json are saved; None disables persistence
    pub config_path: Option<PathBuf>,
    pub theme: Theme,
    pub state: ViewState,
    /// Last task snapshot from the backend
    pub tasks: Vec<Task>,
    pub view: View,
    pub mode: Mode,
    pub prompt: Option<PromptState>,
    pub confirm: Option<ConfirmState>,
    pub columns_screen: Option<ColumnScreenState>,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    /// Task to open in the backend's editor once the event loop regains control
    pub pending_edit: Option<String>,
    pub should_quit: bool,
    pub table_state: TableState,
}

impl App {
    pub fn new(backend: Box<dyn TaskBackend>, config: Config, config_path: Option<PathBuf>) -> Self {
        let theme = Theme::named(&config.theme);
        App {
            backend,
            config,
            config_path,
            theme,
            state: ViewState::default(),
            tasks: Vec::new(),
            view: View::default(),
            mode: Mode::Navigate,
            prompt: None,
            confirm: None,
            columns_screen: None,
            show_help: false,
            status_message: None,
            status_is_error: false,
            pending_edit: None,
            should_quit: false,
            table_state: TableState::default(),
        }
    }

    /// Fetch a fresh snapshot from the backend and rebuild the view
    pub fn refresh(&mut self) {
        self.refresh_at(Utc::now());
    }

    pub fn refresh_at(&mut self, now: DateTime<Utc>) {
        match self.backend.pending_tasks() {
            Ok(tasks) => self.tasks = tasks,
            Err(e) => self.show_error(e.to_string()),
        }
        self.rebuild_at(now);
    }

    /// Rebuild from the cached snapshot
    pub fn rebuild_at(&mut self, now: DateTime<Utc>) {
        self.view = rebuild_view(&self.tasks, &self.state, &self.config.columns, now);
        self.sync_cursor();
    }

    /// Record the cursor row in the view state so the next rebuild finds it again
    fn sync_cursor(&mut self) {
        self.state.cursor = self.view.cursor;
        self.state.highlighted = self.view.selected().map(DisplayRow::key);
        self.table_state
            .select((!self.view.rows.is_empty()).then_some(self.view.cursor));
    }

    pub fn selected_row(&self) -> Option<&DisplayRow> {
        self.view.selected()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.view.selected().and_then(DisplayRow::task)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.set_cursor(self.view.cursor.saturating_add_signed(delta));
    }

    /// Move the cursor, clamped to the last row
    pub fn set_cursor(&mut self, index: usize) {
        self.view.cursor = index.min(self.view.rows.len().saturating_sub(1));
        self.sync_cursor();
    }

    pub fn show_message(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = false;
    }

    pub fn show_error(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::debug!("status error: {}", msg);
        self.status_message = Some(msg);
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    /// Run one backend call. Success refreshes the view; failure leaves the
    /// view alone and shows the backend's message.
    pub fn run_backend(
        &mut self,
        call: impl FnOnce(&dyn TaskBackend) -> Result<(), BackendError>,
    ) -> bool {
        match call(&*self.backend) {
            Ok(()) => {
                self.refresh();
                true
            }
            Err(e) => {
                self.show_error(e.to_string());
                false
            }
        }
    }

    /// Whether the task table is the thing being looked at
    pub fn has_table_focus(&self) -> bool {
        self.mode == Mode::Navigate && !self.show_help
    }

    pub fn restore_ui_state(&mut self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Some(ui) = read_ui_state(&state_path(path)) {
            ui.apply(&mut self.state);
        }
    }

    /// Save expansion and filters to state.json. Failures are only logged.
    pub fn persist_ui_state(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        let path = state_path(path);
        if let Err(e) = write_ui_state(&path, &UiState::capture(&self.state)) {
            log::warn!("could not write {}: {}", path.display(), e);
        }
    }

    /// Write the current column layout back to the config file
    pub fn save_layout(&mut self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = save_column_layout(path, &self.config.columns) {
            self.show_error(e.to_string());
        }
    }

    pub fn cycle_theme(&mut self) {
        let name = next_theme_name(&self.config.theme);
        self.config.theme = name.to_string();
        self.theme = Theme::named(name);
        self.show_message(format!("theme: {}", name));
        if let Some(path) = &self.config_path
            && let Err(e) = save_theme(path, name)
        {
            self.show_error(e.to_string());
        }
    }
}

/// Run the TUI application
pub fn run(config: Config, config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let backend = Taskwarrior::from_config(&config);
    let mut app = App::new(Box::new(backend), config, Some(config_path));
    app.restore_ui_state();
    app.refresh();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    app.persist_ui_state();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let refresh_every = Duration::from_secs(app.config.refresh_secs.max(1));
    let mut last_refresh = Instant::now();
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if let Some(uuid) = app.pending_edit.take() {
            run_editor(terminal, app, &uuid)?;
            last_refresh = Instant::now();
            continue;
        }

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }

        if last_refresh.elapsed() >= refresh_every {
            if app.has_table_focus() {
                app.refresh();
            }
            last_refresh = Instant::now();
        }
    }
    Ok(())
}

/// Hand the terminal to the backend's interactive editor, then take it back
fn run_editor(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    uuid: &str,
) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    let mut cmd = app.backend.edit_command(uuid);
    log::debug!("$ {:?}", cmd);
    let status = cmd.status();

    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()?;

    match status {
        Ok(status) if status.success() => {}
        Ok(status) => app.show_error(format!("editor exited with {}", status)),
        Err(e) => app.show_error(format!("could not run editor: {}", e)),
    }
    app.refresh();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, RowKey};
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn refresh_loads_tasks_and_selects_first_row() {
        let (app, _fake) = app_with_tasks(sample_tasks());
        assert_eq!(app.tasks.len(), 4);
        assert_eq!(app.view.cursor, 0);
        assert_eq!(app.table_state.selected(), Some(0));
        assert!(app.state.highlighted.is_some());
    }

    #[test]
    fn cursor_clamps_to_rows() {
        let (mut app, _fake) = app_with_tasks(sample_tasks());
        let last = app.view.rows.len() - 1;
        app.move_cursor(100);
        assert_eq!(app.view.cursor, last);
        app.move_cursor(-100);
        assert_eq!(app.view.cursor, 0);
    }

    #[test]
    fn highlighted_row_survives_refresh() {
        let (mut app, fake) = app_with_tasks(sample_tasks());
        app.set_cursor(1);
        let key = app.state.highlighted.clone().unwrap();
        fake.borrow_mut()
            .tasks
            .insert(0, task("new", "aaa first", ""));
        app.refresh_at(now());
        assert_eq!(app.selected_row().map(DisplayRow::key), Some(key));
    }

    #[test]
    fn backend_failure_keeps_view_and_shows_stderr() {
        let (mut app, fake) = app_with_tasks(sample_tasks());
        let before = app.view.clone();
        fake.borrow_mut().fail_with = Some("Task not found.".into());
        let ok = app.run_backend(|b| b.start("u1"));
        assert!(!ok);
        assert_eq!(app.view, before);
        assert_eq!(app.status_message.as_deref(), Some("Task not found."));
        assert!(app.status_is_error);
    }

    #[test]
    fn failed_refresh_keeps_last_snapshot() {
        let (mut app, fake) = app_with_tasks(sample_tasks());
        fake.borrow_mut().fail_with = Some("database locked".into());
        app.refresh_at(now());
        assert_eq!(app.tasks.len(), 4);
        assert!(app.status_is_error);
    }

    #[test]
    fn focus_requires_navigate_without_help() {
        let (mut app, _fake) = app_with_tasks(vec![]);
        assert!(app.has_table_focus());
        app.show_help = true;
        assert!(!app.has_table_focus());
        app.show_help = false;
        app.mode = Mode::Prompt;
        assert!(!app.has_table_focus());
    }

    #[test]
    fn ui_state_round_trips_through_config_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        let (mut app, _fake) = app_with_tasks(sample_tasks());
        app.config_path = Some(config_path.clone());
        app.state.expand("work");
        app.state.set_tag_filter("urgent");
        app.persist_ui_state();

        let (mut other, _fake) = app_with_tasks(sample_tasks());
        other.config_path = Some(config_path);
        other.restore_ui_state();
        assert!(other.state.is_expanded("work"));
        assert!(other.state.tag_filter.contains("urgent"));
    }

    #[test]
    fn cycle_theme_persists_name() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        let (mut app, _fake) = app_with_tasks(vec![]);
        app.config_path = Some(config_path.clone());
        app.cycle_theme();
        assert_eq!(app.config.theme, "nord");
        assert_eq!(app.theme.name, "nord");
        let text = std::fs::read_to_string(config_path).unwrap();
        assert!(text.contains("theme = \"nord\""));
    }

    #[test]
    fn project_row_is_selectable() {
        let (mut app, _fake) = app_with_tasks(sample_tasks());
        let idx = app
            .view
            .position(&RowKey::Project("work".into()))
            .unwrap();
        app.set_cursor(idx);
        assert!(app.selected_task().is_none());
        assert_eq!(app.selected_row().map(DisplayRow::project), Some("work"));
        assert!(app.view.columns.contains(&Column::Project));
    }
}
