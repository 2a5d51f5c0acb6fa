//! Walks the configured directories and copies every regular file found.

use crate::config::BackupConfiguration;
use crate::copy::{CopyOutcome, RunOptions, copy_file};
use crate::error::BackupError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Aggregated outcome of one backup run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub files_copied: usize,
    pub bytes_copied: u64,
    /// Directories that were not entered.
    pub skipped: Vec<PathBuf>,
    /// Per-file and per-subtree failures, in the order they happened.
    pub errors: Vec<BackupError>,
    /// Attribute failures on files that were copied.
    pub warnings: Vec<BackupError>,
}

impl RunReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn record(&mut self, outcome: CopyOutcome) {
        for warning in outcome.warnings {
            log::warn!("{warning}");
            self.warnings.push(warning);
        }
        match outcome.error {
            Some(error) => {
                log::error!("{error}");
                self.errors.push(error);
            }
            None => {
                self.files_copied += 1;
                self.bytes_copied += outcome.bytes;
            }
        }
    }
}

/// Backs up every configured directory, in order.
///
/// Excluded directories and the backup location itself are never entered.
/// Failures on single files or subtrees are logged and collected in the
/// report; the walk always carries on.
///
/// # Errors
/// Returns [`BackupError::Configuration`] before touching the filesystem
/// if the configuration has no usable backup location.
pub fn run_backup(
    config: &BackupConfiguration,
    options: &RunOptions,
) -> Result<RunReport, BackupError> {
    config.validate()?;

    let exclusions = config.exclusion_set();
    let mut report = RunReport::default();
    for dir in &config.directories {
        backup_directory(dir, config, &exclusions, options, &mut report);
    }
    Ok(report)
}

fn backup_directory(
    root: &Path,
    config: &BackupConfiguration,
    exclusions: &HashSet<&Path>,
    options: &RunOptions,
    report: &mut RunReport,
) {
    let mut entries = WalkDir::new(root).into_iter();
    while let Some(entry) = entries.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // An unreadable root ends the walk for this directory on its own.
                let path = e.path().unwrap_or(root).to_path_buf();
                let error = BackupError::SubtreeTraversal { path, source: e };
                log::error!("{error}");
                report.errors.push(error);
                continue;
            }
        };

        let path = entry.path();
        let file_type = entry.file_type();
        if file_type.is_dir() {
            if exclusions.contains(path) || path == config.location {
                if options.verbose {
                    log::info!("Skipped {}", path.display());
                }
                report.skipped.push(path.to_path_buf());
                entries.skip_current_dir();
            } else if options.verbose {
                log::info!("Entering {}", path.display());
            }
            continue;
        }
        // Links and special files are not followed or copied.
        if !file_type.is_file() {
            log::debug!("Ignoring {}", path.display());
            continue;
        }

        if options.verbose {
            log::info!("Backing up: {}", path.display());
        }
        report.record(copy_file(path, config, options));
    }
}
