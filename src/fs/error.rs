//! Error type shared by every operation in this crate.

use std::error::Error as StdError;
use std::fmt;

/// An error produced by a filesystem operation.
///
/// Variants carry no message of their own (the on-disk format this crate implements has no
/// notion of error strings); `Display` produces a short, fixed description per kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A null/empty input, a malformed or oversized path, a bad `whence`, or an out-of-range
    /// file descriptor.
    InvalidArgument,
    /// A path component does not exist, or a file descriptor is not in use.
    NotFound,
    /// An operation was attempted on the wrong kind of entry (e.g. opening a directory,
    /// traversing through a file, listing a regular file).
    WrongKind,
    /// No free inode, a full directory (7 entries already), or no free block.
    Exhausted,
    /// `create`/`move` landed on an already-existing name.
    NameConflict,
    /// `remove` was attempted on a non-empty directory.
    NotEmpty,
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidArgument => "invalid argument",
            Self::NotFound => "not found",
            Self::WrongKind => "wrong kind",
            Self::Exhausted => "resource exhausted",
            Self::NameConflict => "name conflict",
            Self::NotEmpty => "directory not empty",
        };
        fmt.write_str(msg)
    }
}

impl StdError for Error {}

/// Shorthand for `Result<T, Error>`, used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
