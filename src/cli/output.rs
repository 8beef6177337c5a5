use serde::Serialize;

use crate::model::{Cell, Column, ColumnLayout, DisplayRow, View};
use crate::util::unicode::{max_line_width, pad_left_to_width, pad_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RowJson {
    pub kind: &'static str,
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    pub cells: Vec<CellJson>,
}

#[derive(Serialize)]
pub struct CellJson {
    pub column: &'static str,
    pub value: serde_json::Value,
}

#[derive(Serialize)]
pub struct ColumnJson {
    pub name: &'static str,
    pub visible: bool,
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

fn cell_value(cell: &Cell) -> serde_json::Value {
    match cell {
        Cell::Empty => serde_json::Value::Null,
        Cell::Text(s) => serde_json::Value::String(s.clone()),
        Cell::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
    }
}

/// Indices of the columns to print: lookups only with `hidden`
fn printed_columns(view: &View, hidden: bool) -> Vec<(usize, Column)> {
    view.columns
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, c)| hidden || !c.is_lookup())
        .collect()
}

pub fn rows_to_json(view: &View, hidden: bool) -> Vec<RowJson> {
    let columns = printed_columns(view, hidden);
    view.rows
        .iter()
        .map(|row| {
            let cells = columns
                .iter()
                .map(|&(idx, column)| CellJson {
                    column: column.name(),
                    value: row.cells().get(idx).map_or(serde_json::Value::Null, cell_value),
                })
                .collect();
            match row {
                DisplayRow::Project(p) => RowJson {
                    kind: "project",
                    project: p.path.clone(),
                    uuid: None,
                    expanded: Some(p.expanded),
                    cells,
                },
                DisplayRow::Task(t) => RowJson {
                    kind: "task",
                    project: t.task.project.clone(),
                    uuid: Some(t.task.uuid.clone()),
                    expanded: None,
                    cells,
                },
            }
        })
        .collect()
}

pub fn layout_to_json(layout: &ColumnLayout) -> Vec<ColumnJson> {
    layout
        .definitions()
        .iter()
        .map(|d| ColumnJson {
            name: d.column.name(),
            visible: d.visible,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

/// Aligned text table: a header line, then one or more lines per row
pub fn format_table(view: &View, hidden: bool) -> Vec<String> {
    let columns = printed_columns(view, hidden);
    let texts: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|&(idx, _)| row.cells().get(idx).map(Cell::to_display).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, (_, column))| {
            texts
                .iter()
                .map(|row| max_line_width(&row[i]))
                .max()
                .unwrap_or(0)
                .max(column.name().len())
        })
        .collect();
    let numeric: Vec<bool> = columns
        .iter()
        .map(|&(idx, _)| {
            view.rows
                .iter()
                .any(|r| matches!(r.cells().get(idx), Some(Cell::Number(_))))
        })
        .collect();

    let join = |parts: Vec<String>| parts.join("  ").trim_end().to_string();

    let mut lines = vec![join(
        columns
            .iter()
            .zip(&widths)
            .map(|((_, c), &w)| pad_to_width(c.name(), w))
            .collect(),
    )];

    for (row, cells) in view.rows.iter().zip(&texts) {
        for line_no in 0..row.height() {
            let parts = cells
                .iter()
                .zip(&widths)
                .zip(&numeric)
                .map(|((text, &w), &num)| {
                    let line = text.lines().nth(line_no).unwrap_or("");
                    if num {
                        pad_left_to_width(line, w)
                    } else {
                        pad_to_width(line, w)
                    }
                })
                .collect();
            lines.push(join(parts));
        }
    }
    lines
}

/// One `[x] name` line per configurable column, in layout order
pub fn format_layout(layout: &ColumnLayout) -> Vec<String> {
    layout
        .definitions()
        .iter()
        .map(|d| format!("[{}] {}", if d.visible { 'x' } else { ' ' }, d.column.name()))
        .collect()
}
