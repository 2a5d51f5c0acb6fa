//! Error taxonomy for a backup run.
//!
//! Only [`BackupError::Configuration`] aborts a run. Every other variant is
//! scoped to a single file or subtree and ends up in the [`RunReport`].
//!
//! [`RunReport`]: crate::walker::RunReport

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackupError {
    /// The configuration cannot be used for a run.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The source path cannot be expressed relative to its volume root.
    #[error("Cannot map '{path}' under the backup root: {reason}")]
    PathMapping { path: PathBuf, reason: String },

    #[error("Cannot stat '{path}': {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The entry vanished or changed type between enumeration and copy.
    #[error("'{0}' is not a regular file")]
    InvalidSource(PathBuf),

    /// Metadata was readable but the file itself could not be opened.
    #[error("Cannot open '{path}': {source}")]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot prepare destination '{path}': {source}")]
    DestinationSetup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed copying '{path}': {source}")]
    StreamCopy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Soft failure after a successful copy.
    #[error("Error preserving {attribute} for '{path}': {source}")]
    AttributePreservation {
        path: PathBuf,
        attribute: Attribute,
        #[source]
        source: io::Error,
    },

    #[error("Error walking '{path}': {source}")]
    SubtreeTraversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// File attribute replicated by `--preserve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    ModificationTime,
    Permissions,
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::ModificationTime => f.write_str("time info"),
            Attribute::Permissions => f.write_str("file mode"),
        }
    }
}

impl BackupError {
    /// Returns true for errors that only downgrade an otherwise successful copy.
    pub fn is_warning(&self) -> bool {
        matches!(self, BackupError::AttributePreservation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_preservation_is_warning() {
        let err = BackupError::AttributePreservation {
            path: PathBuf::from("/backup/a.txt"),
            attribute: Attribute::Permissions,
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.is_warning());
        assert!(err.to_string().contains("file mode"));
    }

    #[test]
    fn test_copy_failures_are_not_warnings() {
        let err = BackupError::InvalidSource(PathBuf::from("/src/fifo"));
        assert!(!err.is_warning());
        assert_eq!(err.to_string(), "'/src/fifo' is not a regular file");

        let err = BackupError::Configuration("backup location is empty".into());
        assert!(!err.is_warning());
    }
}
