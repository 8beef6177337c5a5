use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::backend::{TaskBackend, Taskwarrior};
use crate::io::config_io::{self, default_config_path, expand_tilde, load_config};
use crate::model::project::all_projects;
use crate::model::{Column, Config, Task, ViewState};
use crate::ops::rebuild_view;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let config_path = resolve_config_path(cli.config.as_deref());
    let mut config = load_config(&config_path)?;
    apply_overrides(&mut config, cli.taskrc, cli.task_bin);

    match cli.command {
        None => crate::tui::run(config, config_path),
        Some(Commands::List(args)) => cmd_list(&config, args, json),
        Some(Commands::Columns(cmd)) => cmd_columns(&config_path, config, cmd, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `--config` if given, else the XDG default
pub fn resolve_config_path(flag: Option<&str>) -> PathBuf {
    flag.map(expand_tilde).unwrap_or_else(default_config_path)
}

/// Command-line flags win over the config file for this run only
fn apply_overrides(config: &mut Config, taskrc: Option<String>, task_bin: Option<String>) {
    if let Some(rc) = taskrc {
        config.taskrc = Some(rc);
    }
    if let Some(bin) = task_bin {
        config.task_bin = bin;
    }
}

/// View parameters for a one-shot listing
fn list_state(args: &ListArgs, tasks: &[Task]) -> ViewState {
    let mut state = ViewState::default();
    if let Some(project) = &args.project {
        state.set_project_filter(project);
    }
    state.set_tag_filter(&args.tag.join(","));
    if args.expand_all {
        state.expanded = all_projects(tasks);
    } else {
        for project in &args.expand {
            state.expand(project);
        }
    }
    state
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_list(config: &Config, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let backend = Taskwarrior::from_config(config);
    let tasks = backend.pending_tasks()?;
    let state = list_state(&args, &tasks);
    let view = rebuild_view(&tasks, &state, &config.columns, Utc::now());

    if json {
        let rows = rows_to_json(&view, args.hidden);
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_lines(&format_table(&view, args.hidden));
    }
    Ok(())
}

fn cmd_columns(
    config_path: &Path,
    config: Config,
    cmd: ColumnsCmd,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut layout = config.columns;

    if let Some(action) = cmd.action {
        let (name, offset) = match &action {
            ColumnsAction::Toggle { name } => (name, None),
            ColumnsAction::Move { name, offset } => (name, Some(*offset)),
        };
        let column: Column = name.parse()?;
        let index = layout
            .position(column)
            .ok_or_else(|| format!("column {} is always shown and cannot be changed", column))?;
        match offset {
            None => layout.toggle_visible(index),
            Some(offset) => {
                layout.move_column(index, offset);
            }
        }
        config_io::save_column_layout(config_path, &layout)?;
        log::debug!("saved column layout to {}", config_path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&layout_to_json(&layout))?);
    } else {
        print_lines(&format_layout(&layout));
    }
    Ok(())
}
