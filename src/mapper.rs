//! Maps source files to their place under the backup root.
//!
//! The source's directory structure is kept relative to its volume, so
//! `C:\Users\me\notes.txt` lands at `<root>\Users\me\notes.txt` and
//! `/home/me/notes.txt` at `<root>/home/me/notes.txt`.

use crate::error::BackupError;
use std::path::{Component, Path, PathBuf};

/// Which prefix of a source path identifies its volume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VolumeRoot {
    /// The platform convention: drive or UNC prefix plus the root separator
    /// on Windows, the leading separator elsewhere.
    #[default]
    Native,
    /// A mount point that is stripped instead, e.g. `/mnt/data`.
    Fixed(PathBuf),
}

impl From<Option<&Path>> for VolumeRoot {
    fn from(root: Option<&Path>) -> Self {
        match root {
            Some(path) => VolumeRoot::Fixed(path.to_path_buf()),
            None => VolumeRoot::Native,
        }
    }
}

/// Computes where `source` is copied to under `backup_root`.
///
/// The result is `backup_root` joined with `source` relative to its volume
/// root. No I/O is performed.
///
/// # Errors
/// Returns [`BackupError::PathMapping`] if `backup_root` is empty, `source`
/// is relative, lies outside a fixed volume root, contains `..`, or is the
/// volume root itself.
pub fn map_to_destination(
    source: &Path,
    backup_root: &Path,
    volume: &VolumeRoot,
) -> Result<PathBuf, BackupError> {
    if backup_root.as_os_str().is_empty() {
        return Err(mapping_error(source, "backup root is empty"));
    }
    if !source.is_absolute() {
        return Err(mapping_error(source, "path is not absolute"));
    }

    let rest = match volume {
        VolumeRoot::Native => source,
        VolumeRoot::Fixed(root) => source.strip_prefix(root).map_err(|_| {
            mapping_error(
                source,
                &format!("path is not under volume root '{}'", root.display()),
            )
        })?,
    };
    let rel = relative_components(source, rest)?;
    if rel.as_os_str().is_empty() {
        return Err(mapping_error(source, "path is the volume root itself"));
    }
    Ok(backup_root.join(rel))
}

/// Keeps only the normal components of `rest`, dropping any prefix and root.
fn relative_components(source: &Path, rest: &Path) -> Result<PathBuf, BackupError> {
    let mut rel = PathBuf::new();
    for component in rest.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                return Err(mapping_error(source, "path contains '..'"));
            }
            Component::Normal(part) => rel.push(part),
        }
    }
    Ok(rel)
}

fn mapping_error(path: &Path, reason: &str) -> BackupError {
    BackupError::PathMapping {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_native_strips_leading_separator() {
        let dest = map_to_destination(
            Path::new("/home/me/docs/a.txt"),
            Path::new("/backup"),
            &VolumeRoot::Native,
        )
        .unwrap();
        assert_eq!(dest, PathBuf::from("/backup/home/me/docs/a.txt"));
    }

    #[cfg(windows)]
    #[test]
    fn test_native_strips_drive_prefix() {
        let dest = map_to_destination(
            Path::new(r"C:\Users\me\a.txt"),
            Path::new(r"D:\backup"),
            &VolumeRoot::Native,
        )
        .unwrap();
        assert_eq!(dest, PathBuf::from(r"D:\backup\Users\me\a.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_fixed_volume_root() {
        let volume = VolumeRoot::Fixed(PathBuf::from("/V"));
        let dest =
            map_to_destination(Path::new("/V/a/b/file.txt"), Path::new("/backup"), &volume)
                .unwrap();
        assert_eq!(dest, PathBuf::from("/backup/a/b/file.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_fixed_volume_root_rejects_outside_paths() {
        let volume = VolumeRoot::Fixed(PathBuf::from("/V"));
        let err = map_to_destination(Path::new("/W/a.txt"), Path::new("/backup"), &volume)
            .unwrap_err();
        assert!(matches!(err, BackupError::PathMapping { .. }));
        assert!(err.to_string().contains("not under volume root"));
    }

    #[test]
    fn test_relative_source_is_rejected() {
        let err = map_to_destination(
            Path::new("docs/a.txt"),
            Path::new("/backup"),
            &VolumeRoot::Native,
        )
        .unwrap_err();
        assert!(matches!(err, BackupError::PathMapping { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_backup_root_is_rejected() {
        let err = map_to_destination(Path::new("/a.txt"), Path::new(""), &VolumeRoot::Native)
            .unwrap_err();
        assert!(err.to_string().contains("backup root is empty"));
    }

    #[cfg(unix)]
    #[test]
    fn test_parent_components_are_rejected() {
        let err = map_to_destination(
            Path::new("/home/me/../other/a.txt"),
            Path::new("/backup"),
            &VolumeRoot::Native,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'..'"));
    }

    #[cfg(unix)]
    #[test]
    fn test_volume_root_itself_is_rejected() {
        let err = map_to_destination(Path::new("/"), Path::new("/backup"), &VolumeRoot::Native)
            .unwrap_err();
        assert!(err.to_string().contains("volume root itself"));
    }

    #[cfg(unix)]
    #[test]
    fn test_mapping_is_deterministic() {
        let volume = VolumeRoot::Fixed(PathBuf::from("/srv"));
        let source = Path::new("/srv/photos/2024/img.jpg");
        let first = map_to_destination(source, Path::new("/backup"), &volume).unwrap();
        let second = map_to_destination(source, Path::new("/backup"), &volume).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Path::new("/backup").join("photos/2024/img.jpg"));
    }

    #[test]
    fn test_volume_root_from_option() {
        assert_eq!(VolumeRoot::from(None), VolumeRoot::Native);
        assert_eq!(
            VolumeRoot::from(Some(Path::new("/mnt"))),
            VolumeRoot::Fixed(PathBuf::from("/mnt"))
        );
    }
}
