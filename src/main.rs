mod commands;

use crate::commands::{Cli, Commands, ListKind};
use anyhow::Result;
use backmeup::{RunOptions, sysexits};
use clap::Parser;
use std::process;

/// Entry point for the backmeup CLI application.
/// Parses command-line arguments and dispatches to the appropriate command handler.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger();

    let settings = commands::settings_file(cli.config).unwrap_or_else(|e| {
        eprintln!("{e:#}");
        process::exit(sysexits::EX_USAGE);
    });
    let options = RunOptions {
        verbose: cli.verbose,
        preserve_attributes: cli.preserve,
    };

    match cli.commands.unwrap_or(Commands::Run) {
        Commands::Run => commands::run(&settings, options),
        Commands::Loc { path } => commands::set_location(&settings, path)?,
        Commands::Dir { action } => commands::edit_list(&settings, ListKind::Directories, action)?,
        Commands::Exclude { action } => {
            commands::edit_list(&settings, ListKind::Exclusions, action)?
        }
        Commands::Config => commands::show_config(&settings)?,
        Commands::Map { path } => commands::map(&settings, path)?,
    }
    Ok(())
}

/// Logs to stderr at `info` unless `RUST_LOG` says otherwise.
fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
