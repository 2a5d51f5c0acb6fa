//! Copies a single file into the backup tree.

use crate::config::BackupConfiguration;
use crate::error::{Attribute, BackupError};
use crate::mapper::map_to_destination;
use std::fs::{self, File, FileTimes, Metadata, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Flags for one backup invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Log every visited path and every skipped directory.
    pub verbose: bool,
    /// Copy modification time and permission bits onto the destination.
    pub preserve_attributes: bool,
}

/// Result of copying one file.
#[derive(Debug)]
pub struct CopyOutcome {
    pub source: PathBuf,
    /// `None` when the source could not be mapped.
    pub destination: Option<PathBuf>,
    pub bytes: u64,
    /// Set when the file was not copied.
    pub error: Option<BackupError>,
    /// Attribute failures on an otherwise successful copy.
    pub warnings: Vec<BackupError>,
}

impl CopyOutcome {
    fn failed(source: &Path, destination: Option<PathBuf>, error: BackupError) -> Self {
        Self {
            source: source.to_path_buf(),
            destination,
            bytes: 0,
            error: Some(error),
            warnings: vec![],
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Copies `source` to its mapped place under `config.location`.
///
/// Failures never propagate: they are returned in the outcome so the caller
/// can carry on with the next file. When `options.preserve_attributes` is
/// set, times and permissions are applied after the destination is closed.
pub fn copy_file(source: &Path, config: &BackupConfiguration, options: &RunOptions) -> CopyOutcome {
    let destination = match map_to_destination(source, &config.location, &config.volume()) {
        Ok(destination) => destination,
        Err(e) => return CopyOutcome::failed(source, None, e),
    };

    match copy_contents(source, &destination) {
        Ok((bytes, metadata)) => {
            let warnings = if options.preserve_attributes {
                preserve_attributes(source, &metadata, &destination)
            } else {
                vec![]
            };
            CopyOutcome {
                source: source.to_path_buf(),
                destination: Some(destination),
                bytes,
                error: None,
                warnings,
            }
        }
        Err(e) => CopyOutcome::failed(source, Some(destination), e),
    }
}

/// Streams `source` into `destination`, returning the byte count and the
/// source metadata. Both handles are dropped before this returns.
fn copy_contents(source: &Path, destination: &Path) -> Result<(u64, Metadata), BackupError> {
    let metadata = fs::metadata(source).map_err(|e| BackupError::Stat {
        path: source.to_path_buf(),
        source: e,
    })?;
    // The entry may have been replaced since it was enumerated.
    if !metadata.is_file() {
        return Err(BackupError::InvalidSource(source.to_path_buf()));
    }

    let mut reader = File::open(source).map_err(|e| BackupError::SourceOpen {
        path: source.to_path_buf(),
        source: e,
    })?;

    if let Some(parent) = destination.parent() {
        create_dir_chain(parent).map_err(|e| BackupError::DestinationSetup {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let mut writer =
        create_destination(destination).map_err(|e| BackupError::DestinationSetup {
            path: destination.to_path_buf(),
            source: e,
        })?;

    let bytes = io::copy(&mut reader, &mut writer).map_err(|e| BackupError::StreamCopy {
        path: source.to_path_buf(),
        source: e,
    })?;

    // Close before touching attributes, or the pending write resets the mtime.
    drop(writer);
    Ok((bytes, metadata))
}

fn create_dir_chain(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    builder.create(dir)
}

/// Creates or truncates `path`. A read-only file left by an earlier run with
/// preserved permissions is made writable first.
fn create_destination(path: &Path) -> io::Result<File> {
    match File::create(path) {
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            let mut perms = fs::metadata(path)?.permissions();
            if !perms.readonly() {
                return Err(e);
            }
            make_writable(&mut perms);
            fs::set_permissions(path, perms)?;
            File::create(path)
        }
        other => other,
    }
}

#[cfg(unix)]
fn make_writable(perms: &mut fs::Permissions) {
    use std::os::unix::fs::PermissionsExt;
    perms.set_mode(perms.mode() | 0o200);
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(perms: &mut fs::Permissions) {
    perms.set_readonly(false);
}

fn preserve_attributes(source: &Path, metadata: &Metadata, destination: &Path) -> Vec<BackupError> {
    let mut warnings = vec![];
    if let Err(e) = set_times(metadata, destination) {
        warnings.push(BackupError::AttributePreservation {
            path: source.to_path_buf(),
            attribute: Attribute::ModificationTime,
            source: e,
        });
    }
    // Permissions last: a read-only mode would block reopening for the times.
    if let Err(e) = fs::set_permissions(destination, metadata.permissions()) {
        warnings.push(BackupError::AttributePreservation {
            path: source.to_path_buf(),
            attribute: Attribute::Permissions,
            source: e,
        });
    }
    warnings
}

fn set_times(metadata: &Metadata, destination: &Path) -> io::Result<()> {
    let modified = metadata.modified()?;
    let times = FileTimes::new()
        .set_accessed(modified)
        .set_modified(modified);
    OpenOptions::new()
        .write(true)
        .open(destination)?
        .set_times(times)
}
