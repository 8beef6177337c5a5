pub mod column_layout;
pub mod help_overlay;
pub mod status_row;
pub mod task_table;
#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::{App, Mode};

/// Main render function, dispatching to the sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: title (1 row) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    render_title(frame, app, chunks[0]);

    if app.mode == Mode::Columns {
        column_layout::render_column_layout(frame, app, chunks[1]);
    } else {
        task_table::render_task_table(frame, app, chunks[1]);
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Name, task count and active filters
fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mut spans = vec![
        Span::styled(
            " taskaway",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} tasks", app.tasks.len()),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];
    if !app.state.project_filter.is_empty() {
        spans.push(Span::styled(
            format!("  project:{}", app.state.project_filter),
            Style::default().fg(app.theme.cyan).bg(bg),
        ));
    }
    if !app.state.tag_filter.is_empty() {
        let tags: Vec<&str> = app.state.tag_filter.iter().map(String::as_str).collect();
        spans.push(Span::styled(
            format!("  tags:{}", tags.join(",")),
            Style::default().fg(app.theme.cyan).bg(bg),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}
