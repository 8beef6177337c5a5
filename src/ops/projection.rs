//! Projection of tasks and project groups into table cells.

use chrono::{DateTime, Local, TimeDelta, Utc};

use crate::model::project::{depth, leaf_name};
use crate::model::{ActiveOrder, Cell, Column, ProjectRow, SortKey, Task, TaskRow, ViewState};

/// Render a duration truncated to its coarsest whole unit: `45s`, `12m`,
/// `3h`, `20d`, `2y`. Negative durations get a leading `-`.
pub fn format_duration(delta: TimeDelta) -> String {
    let total = delta.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let seconds = total.unsigned_abs();
    if seconds < 60 {
        return format!("{sign}{seconds}s");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{sign}{minutes}m");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{sign}{hours}h");
    }
    let days = hours / 24;
    if days < 365 {
        return format!("{sign}{days}d");
    }
    format!("{sign}{}y", days / 365)
}

pub fn active_order(task: &Task, now: DateTime<Utc>) -> ActiveOrder {
    match task.active_since {
        Some(start) => ActiveOrder::Started {
            elapsed_secs: (now - start).num_seconds(),
        },
        None => ActiveOrder::Idle,
    }
}

fn text(s: impl Into<String>) -> Cell {
    Cell::Text(s.into())
}

fn format_annotations(task: &Task) -> String {
    task.annotations
        .iter()
        .map(|a| {
            let date = a.entry.with_timezone(&Local).format("%Y-%m-%d");
            format!("{date}: {}", a.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Value of `column` for `task` at time `now`
pub fn task_cell(task: &Task, column: Column, now: DateTime<Utc>) -> Cell {
    match column {
        Column::Project => {
            // Started tasks can sit outside their collapsed group, so show
            // where they live
            if task.is_active() {
                text(&task.project)
            } else {
                Cell::Empty
            }
        }
        Column::Description | Column::DescriptionKey => text(&task.description),
        Column::FullProject | Column::FullProjectKey => text(&task.project),
        Column::Uuid | Column::UuidKey => text(&task.uuid),
        Column::Urgency => Cell::Number(task.urgency),
        Column::Age => text(format_duration(now - task.entry)),
        Column::Tags => text(task.tags.join(",")),
        Column::Due => match task.due {
            Some(due) => text(format_duration(due - now)),
            None => Cell::Empty,
        },
        Column::Annotations => text(format_annotations(task)),
        Column::Active => match task.active_since {
            Some(start) => text(format_duration(now - start)),
            None => Cell::Empty,
        },
        Column::ActiveKey => match active_order(task, now) {
            ActiveOrder::Started { elapsed_secs } => Cell::Number(elapsed_secs as f64),
            ActiveOrder::Idle => Cell::Empty,
        },
    }
}

/// Tree label for a project row: indentation, disclosure glyph, leaf name
pub fn project_label(project: &str, expanded: bool) -> String {
    let glyph = if expanded { "\u{25BC} " } else { "\u{25B6} " };
    format!(
        "{}{}{}",
        "  ".repeat(depth(project)),
        glyph,
        leaf_name(project)
    )
}

pub fn task_row(task: &Task, columns: &[Column], now: DateTime<Utc>) -> TaskRow {
    TaskRow {
        task: task.clone(),
        cells: columns.iter().map(|&c| task_cell(task, c, now)).collect(),
        sort_key: SortKey {
            active: active_order(task, now),
            project: task.project.clone(),
            description: task.description.clone(),
        },
    }
}

pub fn project_row(project: &str, state: &ViewState, columns: &[Column]) -> ProjectRow {
    let expanded = state.is_expanded(project);
    let label = project_label(project, expanded);
    let cells = columns
        .iter()
        .map(|column| match column {
            Column::Project => text(&label),
            Column::FullProjectKey => text(project),
            _ => Cell::Empty,
        })
        .collect();
    ProjectRow {
        path: project.to_string(),
        label,
        expanded,
        cells,
        sort_key: SortKey {
            active: ActiveOrder::Idle,
            project: project.to_string(),
            description: String::new(),
        },
    }
}
