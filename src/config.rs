//! Persistent configuration for backmeup.
//!
//! The settings file is TOML and lives in the platform config directory
//! (`~/.config/backmeup/config.toml` on Linux and macOS). It holds the backup
//! location, the directories to back up and the excluded directories.
//! A run reads it once and never writes it back.

use crate::constants::{CONFIG_NAME, PKG_NAME};
use crate::error::BackupError;
use crate::mapper::VolumeRoot;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Everything a backup run needs to know about what to copy and where.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct BackupConfiguration {
    /// Backup root the source trees are mirrored under.
    pub location: PathBuf,
    /// Directories to back up, walked in this order.
    pub directories: Vec<PathBuf>,
    /// Directories that are never entered.
    pub exclusions: Vec<PathBuf>,
    /// Mount point stripped from source paths instead of the platform volume prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_root: Option<PathBuf>,
}

impl BackupConfiguration {
    /// Loads the configuration from `path`, or returns an empty one if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let toml_str = fs::read_to_string(path)
            .with_context(|| format!("Error reading config file '{}'", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("Error parsing config file '{}'", path.display()))
    }

    /// Writes the configuration to `path` in TOML format.
    ///
    /// Creates the parent directory if it does not exist.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }
        let file = fs::File::create(path)
            .with_context(|| format!("Cannot write config file '{}'", path.display()))?;
        let mut writer = io::BufWriter::new(file);
        let toml_str = toml::to_string_pretty(self)?;
        writer.write_all(toml_str.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn set_location(&mut self, location: PathBuf) {
        self.location = location;
    }

    /// Appends directories to back up. Duplicates are kept.
    pub fn add_directories(&mut self, dirs: impl IntoIterator<Item = PathBuf>) {
        self.directories.extend(dirs);
    }

    /// Removes every occurrence of `dir`. Returns false if it was not listed.
    pub fn remove_directory(&mut self, dir: &Path) -> bool {
        remove_all(&mut self.directories, dir)
    }

    pub fn add_exclusions(&mut self, dirs: impl IntoIterator<Item = PathBuf>) {
        self.exclusions.extend(dirs);
    }

    /// Removes every occurrence of `dir`. Returns false if it was not listed.
    pub fn remove_exclusion(&mut self, dir: &Path) -> bool {
        remove_all(&mut self.exclusions, dir)
    }

    /// Checks that a backup run has an unambiguous destination.
    pub fn validate(&self) -> std::result::Result<(), BackupError> {
        if self.location.as_os_str().is_empty() {
            return Err(BackupError::Configuration(
                "backup location is not set".to_string(),
            ));
        }
        if !self.location.is_absolute() {
            return Err(BackupError::Configuration(format!(
                "backup location '{}' is not an absolute path",
                self.location.display()
            )));
        }
        if let Some(root) = &self.volume_root {
            if !root.is_absolute() {
                return Err(BackupError::Configuration(format!(
                    "volume root '{}' is not an absolute path",
                    root.display()
                )));
            }
        }
        Ok(())
    }

    /// Exclusions as a set for membership tests.
    pub fn exclusion_set(&self) -> HashSet<&Path> {
        self.exclusions.iter().map(PathBuf::as_path).collect()
    }

    pub fn volume(&self) -> VolumeRoot {
        VolumeRoot::from(self.volume_root.as_deref())
    }
}

fn remove_all(list: &mut Vec<PathBuf>, item: &Path) -> bool {
    let before = list.len();
    list.retain(|p| p != item);
    list.len() != before
}

/// Returns the absolute path to the default configuration file.
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_NAME))
}

/// Returns the configuration directory for the application, platform-specific.
#[cfg(not(target_os = "macos"))]
fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Couldn't get the config directory")?;
    Ok(config_dir.join(PKG_NAME))
}

/// Returns the configuration directory for the application, platform-specific.
#[cfg(target_os = "macos")]
fn config_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().context("Couldn't get the home directory")?;
    Ok(home_dir.join(".config").join(PKG_NAME))
}
