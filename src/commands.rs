//! Command-line interface definition for backmeup.
//!
//! Defines the subcommands and their handlers: running the backup and
//! editing the settings file (location, directories, exclusions).

use anyhow::{Context, Result};
use backmeup::config::{self, BackupConfiguration};
use backmeup::path_util::expand_path;
use backmeup::{RunOptions, RunReport, map_to_destination, run_backup, sysexits};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

/// Command-line interface definition for backmeup.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Settings file to use instead of the default one.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Give verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Preserve file modification times and permissions.
    #[arg(short, long, global = true)]
    pub preserve: bool,
    /// Subcommand to execute. Runs the backup when omitted.
    #[command(subcommand)]
    pub commands: Option<Commands>,
}

/// Supported backmeup commands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Back up all configured directories.
    Run,
    /// Set the backup location.
    Loc {
        /// Directory the backups are written to.
        path: PathBuf,
    },
    /// Manage the list of backed up directories.
    Dir {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Manage the list of excluded directories.
    Exclude {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Display the configuration file and its contents.
    Config,
    /// Show where a file would be copied to.
    Map {
        /// Absolute or relative path of a source file.
        path: PathBuf,
    },
}

/// Edits of a directory list.
#[derive(Subcommand, Debug)]
pub(crate) enum ListAction {
    /// Add one or more directories to the list.
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Remove a directory from the list.
    Rm { path: PathBuf },
}

/// Which list of the configuration a [`ListAction`] applies to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ListKind {
    Directories,
    Exclusions,
}

impl ListKind {
    fn name(self) -> &'static str {
        match self {
            ListKind::Directories => "directory",
            ListKind::Exclusions => "exclusion",
        }
    }
}

/// Returns the settings file given on the command line, or the default one.
pub(crate) fn settings_file(cli_path: Option<PathBuf>) -> Result<PathBuf> {
    match cli_path {
        Some(path) => expand_path(&path),
        None => config::config_file(),
    }
}

/// Runs the backup over every configured directory and prints a summary.
///
/// Exits with `EX_CONFIG` if the configuration cannot be used and with
/// `EX_IOERR` if any file or subtree failed.
pub(crate) fn run(settings: &Path, options: RunOptions) {
    let config = BackupConfiguration::load(settings).unwrap_or_else(|e| {
        eprintln!("{e:#}");
        process::exit(sysexits::EX_CONFIG);
    });
    if let Err(e) = config.validate() {
        eprintln!("{e}. Set one with 'backmeup loc <path>'.");
        process::exit(sysexits::EX_CONFIG);
    }
    if config.directories.is_empty() {
        println!("No directories are backed up!");
        return;
    }
    let report = run_backup(&config, &options).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(sysexits::EX_CONFIG);
    });
    println!("{}", display_report(&report));
    if report.has_errors() {
        process::exit(sysexits::EX_IOERR);
    }
}

/// Sets the backup location.
pub(crate) fn set_location(settings: &Path, path: PathBuf) -> Result<()> {
    let path = expand_path(&path)?;
    let mut config = BackupConfiguration::load(settings)?;
    config.set_location(path);
    config.save(settings)?;
    println!("Backup location: {}", config.location.display());
    Ok(())
}

/// Applies an add/rm action to the directory or exclusion list.
pub(crate) fn edit_list(settings: &Path, kind: ListKind, action: ListAction) -> Result<()> {
    let mut config = BackupConfiguration::load(settings)?;
    match action {
        ListAction::Add { paths } => {
            let paths = paths
                .iter()
                .map(|p| expand_path(p))
                .collect::<Result<Vec<_>>>()?;
            for path in &paths {
                println!("Adding {} {}", kind.name(), path.display());
            }
            match kind {
                ListKind::Directories => config.add_directories(paths),
                ListKind::Exclusions => config.add_exclusions(paths),
            }
        }
        ListAction::Rm { path } => {
            let path = expand_path(&path)?;
            let removed = match kind {
                ListKind::Directories => config.remove_directory(&path),
                ListKind::Exclusions => config.remove_exclusion(&path),
            };
            if removed {
                println!("Removed {} {}", kind.name(), path.display());
            } else {
                println!(
                    "{} not removed, not in {} list",
                    path.display(),
                    kind.name()
                );
                return Ok(());
            }
        }
    }
    config.save(settings)
}

/// Prints the settings file path and its contents.
pub(crate) fn show_config(settings: &Path) -> Result<()> {
    let config = BackupConfiguration::load(settings)?;
    println!("config file: {}", settings.display());
    print!("{}", display_config(&config));
    Ok(())
}

/// Prints the destination a source file maps to.
pub(crate) fn map(settings: &Path, path: PathBuf) -> Result<()> {
    let config = BackupConfiguration::load(settings)?;
    config.validate()?;
    let source = expand_path(&path)?;
    let dest = map_to_destination(&source, &config.location, &config.volume())
        .with_context(|| format!("Cannot preview '{}'", source.display()))?;
    println!("{} -> {}", source.display(), dest.display());
    Ok(())
}

fn display_config(config: &BackupConfiguration) -> String {
    let mut s = String::from("Backup Location:\n");
    s.push_str(&format!("\t{}\n", config.location.display()));
    if let Some(root) = &config.volume_root {
        s.push_str(&format!("Volume root:\n\t{}\n", root.display()));
    }
    s.push_str("Backed up directories:\n");
    for dir in &config.directories {
        s.push_str(&format!("\t{}\n", dir.display()));
    }
    s.push_str("Excluded directories:\n");
    for dir in &config.exclusions {
        s.push_str(&format!("\t{}\n", dir.display()));
    }
    s
}

fn display_report(report: &RunReport) -> String {
    let mut s = format!(
        "Backed up {} file(s), {} bytes",
        report.files_copied, report.bytes_copied
    );
    if !report.skipped.is_empty() {
        s.push_str(&format!(", skipped {} directory(ies)", report.skipped.len()));
    }
    if !report.errors.is_empty() {
        s.push_str(&format!("\n{} error(s):", report.errors.len()));
        for error in &report.errors {
            s.push_str(&format!("\n    {error}"));
        }
    }
    if !report.warnings.is_empty() {
        s.push_str(&format!("\n{} warning(s):", report.warnings.len()));
        for warning in &report.warnings {
            s.push_str(&format!("\n    {warning}"));
        }
    }
    s
}
