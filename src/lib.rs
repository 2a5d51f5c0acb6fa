//! backmeup: a personal backup tool that mirrors directories into a backup root.
//!
//! The engine is [`walker::run_backup`], which walks every configured
//! directory and hands each regular file to [`copy::copy_file`]. Destinations
//! come from [`mapper::map_to_destination`].

mod constants;

pub mod config;
pub mod copy;
pub mod error;
pub mod mapper;
pub mod path_util;
pub mod sysexits;
pub mod walker;

pub use config::BackupConfiguration;
pub use copy::{CopyOutcome, RunOptions, copy_file};
pub use error::BackupError;
pub use mapper::{VolumeRoot, map_to_destination};
pub use walker::{RunReport, run_backup};
