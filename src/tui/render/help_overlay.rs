use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

/// (section, [(key, description)]) in display order
const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("\u{2191}\u{2193}/jk", "Move cursor"),
            ("g/G", "Jump to top/bottom"),
            ("Enter", "Expand / collapse project"),
            ("P", "Filter by task project"),
            ("T", "Filter by row tags"),
            ("Esc", "Clear filters"),
        ],
    ),
    (
        "Tasks",
        &[
            ("a", "Add task"),
            ("d", "Mark done"),
            ("b", "Start / stop"),
            ("t", "Add tags"),
            ("A", "Annotate"),
            ("p", "Change project"),
            ("m", "Modify"),
            ("e", "Edit in $EDITOR"),
        ],
    ),
    (
        "Global",
        &[
            ("l", "Column layout"),
            ("Ctrl+T", "Next theme"),
            ("h/?", "Toggle this help"),
            ("q", "Quit"),
        ],
    ),
];

const KEY_WIDTH: usize = 12;

/// Render the help overlay (toggled with h or ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 90, area);
    frame.render_widget(Clear, overlay_area);

    let base = Style::default().bg(app.theme.background);
    let key_style = base.fg(app.theme.highlight).add_modifier(Modifier::BOLD);
    let desc_style = base.fg(app.theme.text);
    let header_style = base.fg(app.theme.text_bright).add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    for (i, (section, bindings)) in BINDINGS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(format!(" {section}"), header_style)));
        lines.extend(bindings.iter().map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!(" {:<width$}", key, width = KEY_WIDTH - 1), key_style),
                Span::styled(*desc, desc_style),
            ])
        }));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Key Bindings ")
        .border_style(base.fg(app.theme.dim))
        .style(base);
    frame.render_widget(Paragraph::new(lines).block(block).style(base), overlay_area);
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use crate::tui::render::test_helpers::*;

    #[test]
    fn overlay_lists_bindings() {
        let (mut app, _fake) = app_with_tasks(sample_tasks());
        app.show_help = true;
        let output = render_to_string(TERM_W, 40, |frame, _| {
            crate::tui::render::render(frame, &mut app)
        });
        assert!(output.contains("Key Bindings"));
        assert!(output.contains("Mark done"));
        assert!(output.contains("Column layout"));
    }
}
