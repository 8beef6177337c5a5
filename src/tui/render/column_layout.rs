use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::App;

/// Render the column layout screen: one `[x] name` line per column
pub fn render_column_layout(frame: &mut Frame, app: &App, area: Rect) {
    let Some(screen) = &app.columns_screen else {
        return;
    };
    let bg = app.theme.background;
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let hidden_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    for (i, def) in screen.layout.definitions().iter().enumerate() {
        let mark = if def.visible { "[x]" } else { "[ ]" };
        let mut style = if def.visible { text_style } else { hidden_style };
        let mut prefix = "  ";
        if i == screen.cursor {
            style = style.bg(app.theme.selection_bg).add_modifier(Modifier::BOLD);
            prefix = if screen.move_mode { "\u{2195} " } else { "> " };
        }
        lines.push(Line::from(vec![
            Span::styled(prefix, Style::default().fg(app.theme.highlight).bg(bg)),
            Span::styled(format!("{} {}", mark, def.column.name()), style),
        ]));
    }

    let title = if screen.move_mode {
        " columns (moving) "
    } else {
        " columns "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::{ColumnScreenState, Mode};
    use crate::tui::render::test_helpers::*;
    use insta::assert_snapshot;

    #[test]
    fn default_layout_screen() {
        let (mut app, _fake) = app_with_tasks(vec![]);
        app.columns_screen = Some(ColumnScreenState {
            layout: app.config.columns.clone(),
            cursor: 1,
            move_mode: false,
        });
        app.mode = Mode::Columns;
        let output = render_to_string(30, 12, |frame, area| {
            render_column_layout(frame, &app, area);
        });
        assert_snapshot!(output, @r"
        ┌ columns ───────────────────┐
        │  [x] description           │
        │> [x] age                   │
        │  [x] due                   │
        │  [x] tags                  │
        │  [ ] urg                   │
        │  [ ] full_project          │
        │  [ ] uuid                  │
        │  [ ] annotations           │
        │  [ ] active                │
        │                            │
        └────────────────────────────┘
        ");
    }

    #[test]
    fn move_mode_marker() {
        let (mut app, _fake) = app_with_tasks(vec![]);
        app.columns_screen = Some(ColumnScreenState {
            layout: app.config.columns.clone(),
            cursor: 0,
            move_mode: true,
        });
        let output = render_to_string(30, 12, |frame, area| {
            render_column_layout(frame, &app, area);
        });
        assert!(output.starts_with("┌ columns (moving) "));
        assert!(output.contains("\u{2195} [x] description"));
    }
}
