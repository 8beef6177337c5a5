use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Cell as TableCell, Paragraph, Row, Table};

use crate::model::{Cell, Column, DisplayRow};
use crate::tui::app::App;
use crate::util::unicode::{max_line_width, truncate_to_width};

/// Widest a fixed-width column may grow
const MAX_COLUMN_WIDTH: usize = 40;

/// Render the task table with the cursor row highlighted
pub fn render_task_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;

    if app.view.rows.is_empty() {
        let msg = if app.state.has_filters() {
            " no tasks match the current filters (Esc clears)"
        } else {
            " no pending tasks"
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg)),
            area,
        );
        return;
    }

    // Lookup columns back sorting and identity; they are never drawn
    let shown: Vec<(usize, Column)> = app
        .view
        .columns
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, c)| !c.is_lookup())
        .collect();

    let widths: Vec<usize> = shown
        .iter()
        .map(|&(idx, column)| column_width(&app.view.rows, idx, column))
        .collect();
    let constraints: Vec<Constraint> = shown
        .iter()
        .zip(&widths)
        .map(|(&(_, column), &w)| match column {
            Column::Description => Constraint::Fill(1),
            _ => Constraint::Length(w as u16),
        })
        .collect();

    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let header = Row::new(shown.iter().map(|(_, c)| TableCell::from(c.name())))
        .style(header_style);

    let rows: Vec<Row> = app
        .view
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let row_bg = if i % 2 == 1 { app.theme.stripe_bg } else { bg };
            let fg = match row {
                DisplayRow::Task(t) if t.task.is_active() => app.theme.green,
                _ => app.theme.text,
            };
            let cells = shown.iter().zip(&widths).map(|(&(idx, column), &w)| {
                let cell = row.cells().get(idx).unwrap_or(&Cell::Empty);
                let width = (column != Column::Description).then_some(w);
                styled_cell(app, row, column, cell, width)
            });
            Row::new(cells)
                .height(row.height() as u16)
                .style(Style::default().fg(fg).bg(row_bg))
        })
        .collect();

    let table = Table::new(rows, constraints)
        .header(header)
        .style(Style::default().bg(bg))
        .row_highlight_style(
            Style::default()
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

/// Header width or the widest value, capped for everything but the tree column
fn column_width(rows: &[DisplayRow], idx: usize, column: Column) -> usize {
    let widest = rows
        .iter()
        .filter_map(|r| r.cells().get(idx))
        .map(|c| max_line_width(&c.to_display()))
        .max()
        .unwrap_or(0)
        .max(column.name().len());
    match column {
        Column::Project => widest,
        _ => widest.min(MAX_COLUMN_WIDTH),
    }
}

fn styled_cell<'a>(
    app: &App,
    row: &DisplayRow,
    column: Column,
    cell: &Cell,
    width: Option<usize>,
) -> TableCell<'a> {
    let text = cell.to_display();
    let lines: Vec<Line> = text
        .lines()
        .map(|line| match width {
            Some(w) => Line::from(truncate_to_width(line, w)),
            None => Line::from(line.to_string()),
        })
        .collect();

    let mut style = Style::default();
    match (row, column) {
        (DisplayRow::Project(_), Column::Project) => {
            style = style.fg(app.theme.highlight).add_modifier(Modifier::BOLD);
        }
        (DisplayRow::Task(_), Column::Project) => {
            style = style.fg(app.theme.dim);
        }
        (_, Column::Due) if text.starts_with('-') => {
            style = style.fg(app.theme.red);
        }
        (_, Column::Tags) => {
            style = style.fg(app.theme.cyan);
        }
        _ => {}
    }
    TableCell::from(Text::from(lines)).style(style)
}
