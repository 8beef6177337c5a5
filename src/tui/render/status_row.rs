use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::display_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match app.mode {
        Mode::Prompt => match &app.prompt {
            Some(prompt) => {
                // label: text▌text
                let (before, after) = prompt.input.split_at(prompt.cursor);
                let spans = vec![
                    Span::styled(
                        format!("{}: ", prompt.label),
                        Style::default().fg(app.theme.highlight).bg(bg),
                    ),
                    Span::styled(
                        before.to_string(),
                        Style::default().fg(app.theme.text_bright).bg(bg),
                    ),
                    Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
                    Span::styled(
                        after.to_string(),
                        Style::default().fg(app.theme.text_bright).bg(bg),
                    ),
                ];
                (spans, "Enter submit  Esc cancel")
            }
            None => (Vec::new(), ""),
        },
        Mode::Confirm => match &app.confirm {
            Some(confirm) => (
                vec![Span::styled(
                    format!("{} ", confirm.question),
                    Style::default().fg(app.theme.yellow).bg(bg),
                )],
                "y/n",
            ),
            None => (Vec::new(), ""),
        },
        Mode::Columns => (Vec::new(), "Space toggle  m move  Esc save"),
        Mode::Navigate => match &app.status_message {
            Some(msg) => {
                let fg = if app.status_is_error {
                    app.theme.red
                } else {
                    app.theme.text
                };
                (vec![Span::styled(msg.clone(), Style::default().fg(fg).bg(bg))], "")
            }
            None => (Vec::new(), "? help"),
        },
    };

    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
