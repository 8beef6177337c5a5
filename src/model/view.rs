use std::collections::BTreeSet;
use std::fmt;

use super::column::Column;
use super::task::Task;

/// User-controlled view parameters.
///
/// Owned by the caller and passed into the view builder, which only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Literal prefix the task project must start with (empty = no filter)
    pub project_filter: String,
    /// A task must carry at least one of these tags (empty = no filter)
    pub tag_filter: BTreeSet<String>,
    /// Expanded project paths. The root `""` is always treated as expanded.
    pub expanded: BTreeSet<String>,
    /// Row the cursor was on before the last rebuild
    pub highlighted: Option<RowKey>,
    /// Cursor index before the last rebuild, used when `highlighted` is gone
    pub cursor: usize,
}

impl ViewState {
    pub fn is_expanded(&self, project: &str) -> bool {
        project.is_empty() || self.expanded.contains(project)
    }

    pub fn expand(&mut self, project: &str) {
        if !project.is_empty() {
            self.expanded.insert(project.to_string());
        }
    }

    /// Collapse `project` along with every expanded path it prefixes
    pub fn collapse(&mut self, project: &str) {
        if project.is_empty() {
            return;
        }
        self.expanded.retain(|p| !p.starts_with(project));
    }

    pub fn toggle_expanded(&mut self, project: &str) {
        if self.is_expanded(project) {
            self.collapse(project);
        } else {
            self.expand(project);
        }
    }

    pub fn set_project_filter(&mut self, filter: &str) {
        self.project_filter = filter.trim().to_string();
    }

    /// Replace the tag filter from a comma separated list
    pub fn set_tag_filter(&mut self, tags: &str) {
        self.tag_filter = tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
    }

    pub fn clear_filters(&mut self) {
        self.project_filter.clear();
        self.tag_filter.clear();
    }

    pub fn has_filters(&self) -> bool {
        !self.project_filter.is_empty() || !self.tag_filter.is_empty()
    }
}

/// Stable identity of a display row across rebuilds
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Task { uuid: String, description: String },
    Project(String),
}

/// First sort component: started tasks by elapsed time, then everything else
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActiveOrder {
    Started { elapsed_secs: i64 },
    Idle,
}

/// Row ordering: active order, then full project path, then description
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub active: ActiveOrder,
    pub project: String,
    pub description: String,
}

/// A single projected column value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Text shown in a table; numbers keep at most two decimals
    pub fn to_display(&self) -> String {
        match self {
            Cell::Number(n) if n.fract() == 0.0 => format!("{n:.0}"),
            Cell::Number(n) => format!("{n:.2}"),
            other => other.to_string(),
        }
    }

    /// Lines the cell occupies when drawn
    pub fn line_count(&self) -> usize {
        match self {
            Cell::Text(s) => s.lines().count().max(1),
            _ => 1,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Synthetic row standing for a project group
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRow {
    pub path: String,
    /// Indentation, disclosure glyph and leaf name
    pub label: String,
    pub expanded: bool,
    pub cells: Vec<Cell>,
    pub sort_key: SortKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub task: Task,
    pub cells: Vec<Cell>,
    pub sort_key: SortKey,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayRow {
    Project(ProjectRow),
    Task(TaskRow),
}

impl DisplayRow {
    pub fn key(&self) -> RowKey {
        match self {
            DisplayRow::Project(row) => RowKey::Project(row.path.clone()),
            DisplayRow::Task(row) => RowKey::Task {
                uuid: row.task.uuid.clone(),
                description: row.task.description.clone(),
            },
        }
    }

    pub fn has_key(&self, key: &RowKey) -> bool {
        match (self, key) {
            (DisplayRow::Project(row), RowKey::Project(path)) => row.path == *path,
            (DisplayRow::Task(row), RowKey::Task { uuid, description }) => {
                row.task.uuid == *uuid && row.task.description == *description
            }
            _ => false,
        }
    }

    pub fn sort_key(&self) -> &SortKey {
        match self {
            DisplayRow::Project(row) => &row.sort_key,
            DisplayRow::Task(row) => &row.sort_key,
        }
    }

    /// Values aligned with [`View::columns`]
    pub fn cells(&self) -> &[Cell] {
        match self {
            DisplayRow::Project(row) => &row.cells,
            DisplayRow::Task(row) => &row.cells,
        }
    }

    pub fn task(&self) -> Option<&Task> {
        match self {
            DisplayRow::Task(row) => Some(&row.task),
            DisplayRow::Project(_) => None,
        }
    }

    /// Full project path of the row (the task's project for task rows)
    pub fn project(&self) -> &str {
        match self {
            DisplayRow::Project(row) => &row.path,
            DisplayRow::Task(row) => &row.task.project,
        }
    }

    pub fn height(&self) -> usize {
        self.cells().iter().map(Cell::line_count).max().unwrap_or(1)
    }
}

/// Output of a rebuild: ordered rows and the restored cursor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    pub columns: Vec<Column>,
    pub rows: Vec<DisplayRow>,
    pub cursor: usize,
}

impl View {
    pub fn selected(&self) -> Option<&DisplayRow> {
        self.rows.get(self.cursor)
    }

    pub fn position(&self, key: &RowKey) -> Option<usize> {
        self.rows.iter().position(|row| row.has_key(key))
    }

    /// Cell of `row` in `column`, if the column is part of the table
    pub fn cell<'a>(&self, row: &'a DisplayRow, column: Column) -> Option<&'a Cell> {
        let index = self.columns.iter().position(|&c| c == column)?;
        row.cells().get(index)
    }

    pub fn task_count(&self) -> usize {
        self.rows.iter().filter(|r| r.task().is_some()).count()
    }
}
