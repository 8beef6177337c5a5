use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode, PromptAction, PromptState};
use crate::util::unicode;

pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.prompt.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => close_prompt(app),
        (_, KeyCode::Enter) => {
            let prompt = app.prompt.take();
            app.mode = Mode::Navigate;
            if let Some(prompt) = prompt {
                submit_prompt(app, prompt);
            }
        }
        (m, KeyCode::Char(c)) if m.contains(KeyModifiers::CONTROL) => match c {
            'a' => prompt.cursor = 0,
            'e' => prompt.cursor = prompt.input.len(),
            'u' => {
                prompt.input.drain(..prompt.cursor);
                prompt.cursor = 0;
            }
            'w' => {
                let start = unicode::word_boundary_left(&prompt.input, prompt.cursor);
                prompt.input.drain(start..prompt.cursor);
                prompt.cursor = start;
            }
            _ => {}
        },
        (m, KeyCode::Left) if m.contains(KeyModifiers::ALT) => {
            prompt.cursor = unicode::word_boundary_left(&prompt.input, prompt.cursor);
        }
        (m, KeyCode::Right) if m.contains(KeyModifiers::ALT) => {
            prompt.cursor = unicode::word_boundary_right(&prompt.input, prompt.cursor);
        }
        (_, KeyCode::Left) => {
            if let Some(pos) = unicode::prev_grapheme_boundary(&prompt.input, prompt.cursor) {
                prompt.cursor = pos;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(pos) = unicode::next_grapheme_boundary(&prompt.input, prompt.cursor) {
                prompt.cursor = pos;
            }
        }
        (_, KeyCode::Home) => prompt.cursor = 0,
        (_, KeyCode::End) => prompt.cursor = prompt.input.len(),
        (_, KeyCode::Backspace) => {
            if let Some(pos) = unicode::prev_grapheme_boundary(&prompt.input, prompt.cursor) {
                prompt.input.drain(pos..prompt.cursor);
                prompt.cursor = pos;
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(end) = unicode::next_grapheme_boundary(&prompt.input, prompt.cursor) {
                prompt.input.drain(prompt.cursor..end);
            }
        }
        (_, KeyCode::Char(c)) => {
            prompt.input.insert(prompt.cursor, c);
            prompt.cursor += c.len_utf8();
        }
        _ => {}
    }
}

fn close_prompt(app: &mut App) {
    app.prompt = None;
    app.mode = Mode::Navigate;
}

/// Send the prompt's input to the backend. Blank input cancels.
fn submit_prompt(app: &mut App, prompt: PromptState) {
    let input = prompt.input.trim();
    if input.is_empty() {
        return;
    }

    match prompt.action {
        PromptAction::AddTags { uuid } => {
            let tags = tag_args(input);
            app.run_backend(|b| b.modify(&uuid, &tags));
        }
        PromptAction::Annotate { uuid } => {
            app.run_backend(|b| b.annotate(&uuid, input));
        }
        PromptAction::AddTask => {
            if let Some(args) = split_args(app, input) {
                app.run_backend(|b| b.add(&args));
            }
        }
        PromptAction::Modify { uuid } => {
            if let Some(args) = split_args(app, input) {
                app.run_backend(|b| b.modify(&uuid, &args));
            }
        }
    }
}

/// Each word becomes a `+tag` argument
fn tag_args(input: &str) -> Vec<String> {
    input
        .split_whitespace()
        .map(|word| format!("+{}", word.trim_start_matches('+')))
        .collect()
}

/// Shell-style split so quoted descriptions stay one argument
fn split_args(app: &mut App, input: &str) -> Option<Vec<String>> {
    let args = shlex::split(input);
    if args.is_none() {
        app.show_error(format!("unbalanced quotes in: {}", input));
    }
    args
}
