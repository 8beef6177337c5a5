use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "taskaway",
    about = concat!("taskaway v", env!("CARGO_PKG_VERSION"), " - a project tree over your Taskwarrior tasks"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: $XDG_CONFIG_HOME/taskaway/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Taskwarrior rc file, overriding the config
    #[arg(long, global = true)]
    pub taskrc: Option<String>,

    /// Taskwarrior binary, overriding the config
    #[arg(long = "task-bin", global = true)]
    pub task_bin: Option<String>,

    /// Log debug output (to stderr, or taskaway.log in the TUI)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the task tree once
    List(ListArgs),
    /// Show or change the column layout
    Columns(ColumnsCmd),
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show projects starting with this prefix
    #[arg(long)]
    pub project: Option<String>,
    /// Only show tasks carrying this tag (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,
    /// Expand this project (repeatable)
    #[arg(long)]
    pub expand: Vec<String>,
    /// Expand every project
    #[arg(long)]
    pub expand_all: bool,
    /// Include the hidden lookup columns
    #[arg(long)]
    pub hidden: bool,
}

#[derive(Args)]
pub struct ColumnsCmd {
    #[command(subcommand)]
    pub action: Option<ColumnsAction>,
}

#[derive(Subcommand)]
pub enum ColumnsAction {
    /// Show or hide a column
    Toggle {
        /// Column name
        name: String,
    },
    /// Move a column up (negative) or down (positive)
    Move {
        /// Column name
        name: String,
        /// Positions to move
        #[arg(allow_negative_numbers = true)]
        offset: isize,
    },
}
