//! Exit status codes used by the `backmeup` binary.
//! reference: [SYSEXITS](https://man.freebsd.org/cgi/man.cgi?query=sysexits&sektion=3)

/// value: 64 <br>
/// A subcommand was called with missing or malformed arguments.
pub const EX_USAGE: i32 = 64;

/// value: 74 <br>
/// The backup ran to the end but at least one file or subtree failed.
pub const EX_IOERR: i32 = 74;

/// value: 78 <br>
/// The settings file is unreadable or has no usable backup location.
pub const EX_CONFIG: i32 = 78;
