use std::fs::{self, OpenOptions};

use clap::Parser;
use env_logger::{Builder, Env, Target};
use taskaway::cli::commands::Cli;
use taskaway::cli::handlers;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Logging is off unless `--verbose` or RUST_LOG asks for it. The TUI owns the
/// terminal, so it logs to taskaway.log next to the config file instead.
fn init_logging(cli: &Cli) {
    let mut builder = Builder::from_env(
        Env::default().default_filter_or(if cli.verbose { "debug" } else { "off" }),
    );

    let enabled = cli.verbose || std::env::var_os("RUST_LOG").is_some();
    if cli.command.is_none() && enabled {
        let config_path = handlers::resolve_config_path(cli.config.as_deref());
        let log_path = config_path.with_file_name("taskaway.log");
        if let Some(dir) = log_path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match OpenOptions::new().create(true).append(true).open(&log_path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            // Nowhere safe to write; stderr would corrupt the screen
            Err(_) => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    builder.init();
}
