//! The in-memory file descriptor table: 256 fixed slots of (inode index, byte offset).

use crate::error::{Error, Result};
use crate::layout::FD_COUNT;

#[derive(Clone, Copy, Debug)]
struct Descriptor {
    /// `None` means the slot is free.
    inode_index: Option<u16>,
    offset: u64,
}

/// Where a `seek` offset is measured from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Whence {
    Set,
    Cur,
    End,
}

pub struct FdTable {
    slots: Vec<Descriptor>,
}

impl FdTable {
    pub fn new() -> Self {
        Self {
            slots: vec![
                Descriptor {
                    inode_index: None,
                    offset: 0,
                };
                FD_COUNT
            ],
        }
    }

    /// Finds the first free slot, occupies it for `inode_index` at offset 0, and returns its
    /// index.
    pub fn open(&mut self, inode_index: u16) -> Result<usize> {
        let slot = self
            .slots
            .iter()
            .position(|d| d.inode_index.is_none())
            .ok_or(Error::Exhausted)?;
        self.slots[slot] = Descriptor {
            inode_index: Some(inode_index),
            offset: 0,
        };
        Ok(slot)
    }

    /// Frees `fd`. Errors if out of range or already free.
    pub fn close(&mut self, fd: usize) -> Result<()> {
        let desc = self.slots.get_mut(fd).ok_or(Error::InvalidArgument)?;
        if desc.inode_index.is_none() {
            return Err(Error::NotFound);
        }
        desc.inode_index = None;
        desc.offset = 0;
        Ok(())
    }

    /// Returns `(inode_index, offset)` for an in-use descriptor.
    pub fn get(&self, fd: usize) -> Result<(u16, u64)> {
        let desc = self.slots.get(fd).ok_or(Error::InvalidArgument)?;
        let inode_index = desc.inode_index.ok_or(Error::InvalidArgument)?;
        Ok((inode_index, desc.offset))
    }

    pub fn set_offset(&mut self, fd: usize, offset: u64) -> Result<()> {
        let desc = self.slots.get_mut(fd).ok_or(Error::InvalidArgument)?;
        if desc.inode_index.is_none() {
            return Err(Error::InvalidArgument);
        }
        desc.offset = offset;
        Ok(())
    }

    /// Marks every descriptor free, as done at mount.
    pub fn reset(&mut self) {
        for desc in &mut self.slots {
            desc.inode_index = None;
            desc.offset = 0;
        }
    }
}

/// Computes a new offset for `seek`, clamped to `[0, file_size]`.
pub fn compute_seek(current: u64, file_size: u64, offset: i64, whence: Whence) -> u64 {
    let base = match whence {
        Whence::Set => 0i64,
        Whence::Cur => current as i64,
        Whence::End => file_size as i64,
    };
    let target = base.saturating_add(offset);
    target.clamp(0, file_size as i64) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_close_reuses_slot() {
        let mut table = FdTable::new();
        let fd = table.open(3).unwrap();
        assert_eq!(table.get(fd).unwrap(), (3, 0));
        table.close(fd).unwrap();
        assert_eq!(table.get(fd).unwrap_err(), Error::InvalidArgument);
    }

    #[test]
    fn close_twice_fails() {
        let mut table = FdTable::new();
        let fd = table.open(1).unwrap();
        table.close(fd).unwrap();
        assert_eq!(table.close(fd).unwrap_err(), Error::NotFound);
    }

    #[test]
    fn seek_clamps_to_bounds() {
        assert_eq!(compute_seek(10, 100, -1000, Whence::Cur), 0);
        assert_eq!(compute_seek(10, 100, 1000, Whence::Cur), 100);
        assert_eq!(compute_seek(10, 100, 50, Whence::Set), 50);
        assert_eq!(compute_seek(10, 100, -10, Whence::End), 90);
    }
}
