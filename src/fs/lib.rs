//! A single-user, single-threaded hierarchical filesystem over a fixed-geometry block store:
//! 512-byte blocks, 16-bit block ids, 256 inodes with direct/indirect/double-indirect
//! pointers, and a 256-entry file descriptor table.
//!
//! [`Fs::format`] creates a backing file and its on-disk structures from scratch;
//! [`Fs::mount`] loads an existing one. Everything else, `create`, `open`, `read`, `write`,
//! and so on, is a method on the returned [`Fs`] handle.

pub mod block_ptr;
pub mod block_store;
pub mod dirent;
pub mod error;
pub mod fd;
pub mod inode;
pub mod layout;
pub mod path;
pub mod resolve;
#[cfg(test)]
mod testutil;
pub mod volume;

pub use block_store::BlockStore;
pub use error::{Error, Result};
pub use fd::Whence;
pub use inode::FileType;
pub use volume::Fs;
