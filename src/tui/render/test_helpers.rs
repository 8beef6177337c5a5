use std::cell::RefCell;
use std::process::Command;
use std::rc::Rc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::backend::{BackendError, TaskBackend};
use crate::model::{Config, Task};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole app at the standard test size
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| super::render(frame, app))
}

/// Fixed clock for tests
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn task(uuid: &str, description: &str, project: &str) -> Task {
    let mut t = Task::new(uuid, description, now() - TimeDelta::days(2));
    t.project = project.to_string();
    t
}

/// Four tasks: one without a project, one in `home`, one in `work.api`
/// and an active one in `work`.
pub fn sample_tasks() -> Vec<Task> {
    let mut report = task("u1", "write report", "");
    report.urgency = 4.5;

    let mut milk = task("u2", "buy milk", "home");
    milk.tags = vec!["errand".into()];

    let mut bug = task("u3", "fix bug", "work.api");
    bug.tags = vec!["urgent".into()];
    bug.due = Some(now() - TimeDelta::days(1));

    let mut standup = task("u4", "standup", "work");
    standup.active_since = Some(now() - TimeDelta::seconds(10));

    vec![report, milk, bug, standup]
}

/// Shared state behind [`FakeBackend`], inspectable from tests
#[derive(Debug, Default)]
pub struct FakeState {
    pub tasks: Vec<Task>,
    /// Every mutating call, rendered like a `task` command line
    pub calls: Vec<String>,
    /// When set, every call fails with this message
    pub fail_with: Option<String>,
}

pub struct FakeBackend {
    state: Rc<RefCell<FakeState>>,
}

impl FakeBackend {
    fn record(&self, call: String) -> Result<(), BackendError> {
        let mut state = self.state.borrow_mut();
        if let Some(msg) = &state.fail_with {
            return Err(BackendError::Failed(msg.clone()));
        }
        state.calls.push(call);
        Ok(())
    }
}

impl TaskBackend for FakeBackend {
    fn pending_tasks(&self) -> Result<Vec<Task>, BackendError> {
        let state = self.state.borrow();
        match &state.fail_with {
            Some(msg) => Err(BackendError::Failed(msg.clone())),
            None => Ok(state.tasks.clone()),
        }
    }

    fn mark_done(&self, uuid: &str) -> Result<(), BackendError> {
        self.record(format!("{uuid} done"))?;
        self.state.borrow_mut().tasks.retain(|t| t.uuid != uuid);
        Ok(())
    }

    fn modify(&self, uuid: &str, args: &[String]) -> Result<(), BackendError> {
        self.record(format!("{uuid} modify {}", args.join(" ")))
    }

    fn annotate(&self, uuid: &str, text: &str) -> Result<(), BackendError> {
        self.record(format!("{uuid} annotate {text}"))
    }

    fn start(&self, uuid: &str) -> Result<(), BackendError> {
        self.record(format!("{uuid} start"))
    }

    fn stop(&self, uuid: &str) -> Result<(), BackendError> {
        self.record(format!("{uuid} stop"))
    }

    fn add(&self, args: &[String]) -> Result<(), BackendError> {
        self.record(format!("add {}", args.join(" ")))
    }

    fn edit_command(&self, uuid: &str) -> Command {
        let mut cmd = Command::new("true");
        cmd.arg(uuid);
        cmd
    }
}

/// Build an App over a fake backend holding `tasks`, refreshed at [`now`].
/// Nothing is persisted.
pub fn app_with_tasks(tasks: Vec<Task>) -> (App, Rc<RefCell<FakeState>>) {
    let state = Rc::new(RefCell::new(FakeState {
        tasks,
        ..FakeState::default()
    }));
    let backend = FakeBackend {
        state: Rc::clone(&state),
    };
    let mut app = App::new(Box::new(backend), Config::default(), None);
    app.refresh_at(now());
    (app, state)
}

/// Move the cursor to the row for task `uuid`
pub fn select_task(app: &mut App, uuid: &str) {
    let idx = app
        .view
        .rows
        .iter()
        .position(|r| r.task().is_some_and(|t| t.uuid == uuid))
        .unwrap();
    app.set_cursor(idx);
}

/// Move the cursor to the project row for `path`
pub fn select_project(app: &mut App, path: &str) {
    let idx = app
        .view
        .position(&crate::model::RowKey::Project(path.to_string()))
        .unwrap();
    app.set_cursor(idx);
}
