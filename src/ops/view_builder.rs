use chrono::{DateTime, Utc};

use crate::model::project::all_projects;
use crate::model::{ColumnLayout, DisplayRow, Task, View, ViewState};

use super::filter::{is_task_visible, tagged_projects, visible_projects};
use super::projection::{project_row, task_row};

/// Build the ordered row list for one refresh.
///
/// Pure apart from `now`, which drives the relative-time columns and the
/// active ordering. Task rows come first, then project rows, and a stable
/// sort on [`SortKey`](crate::model::SortKey) interleaves them.
pub fn rebuild_view(
    tasks: &[Task],
    state: &ViewState,
    layout: &ColumnLayout,
    now: DateTime<Utc>,
) -> View {
    let columns = layout.table_columns();

    let mut rows: Vec<DisplayRow> = tasks
        .iter()
        .filter(|t| is_task_visible(t, state))
        .map(|t| DisplayRow::Task(task_row(t, &columns, now)))
        .collect();
    let task_rows = rows.len();

    let projects = all_projects(tasks);
    let tagged = tagged_projects(tasks, state);
    rows.extend(
        visible_projects(&projects, state, &tagged)
            .map(|p| DisplayRow::Project(project_row(p, state, &columns))),
    );

    sort_rows(&mut rows);
    let cursor = restore_cursor(&rows, state);

    log::trace!(
        "rebuilt view: {} tasks in, {} task rows, {} project rows, cursor {}",
        tasks.len(),
        task_rows,
        rows.len() - task_rows,
        cursor
    );

    View {
        columns,
        rows,
        cursor,
    }
}

/// Stable ascending sort by (active order, project, description)
pub fn sort_rows(rows: &mut [DisplayRow]) {
    rows.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
}

/// Index of the previously highlighted row, or the previous cursor clamped
/// to the new row count when that row is gone.
pub fn restore_cursor(rows: &[DisplayRow], state: &ViewState) -> usize {
    if rows.is_empty() {
        return 0;
    }
    state
        .highlighted
        .as_ref()
        .and_then(|key| rows.iter().position(|row| row.has_key(key)))
        .unwrap_or_else(|| state.cursor.min(rows.len() - 1))
}
