//! The mounted filesystem handle and its public namespace operations: format, mount, unmount,
//! create, open, close, seek, read, write, remove, move, list.

use crate::block_ptr::{self, Mode};
use crate::block_store::BlockStore;
use crate::dirent::{DirBlock, Record};
use crate::error::{Error, Result};
use crate::fd::{FdTable, Whence};
use crate::inode::{FileType, Inode, INODE_SIZE};
use crate::layout::{
    BLOCK_SIZE, DATA_REGION_START, INODES_PER_BLOCK, INODE_COUNT, INODE_REGION_START, MAX_PATH_LEN,
    ROOT_INODE,
};
use crate::path;
use crate::resolve::{self, split_last};
use std::path::Path;

/// A mounted filesystem. Not `Sync`: every operation assumes exclusive, synchronous access,
/// as in the system this crate implements (see the crate's concurrency notes).
pub struct Fs {
    store: BlockStore,
    inodes: Vec<Inode>,
    fds: FdTable,
}

impl Fs {
    /// Creates a fresh backing file at `path` and formats it: a zeroed inode region except
    /// for the root directory's inode, and a zeroed root directory block.
    pub fn format<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut store = BlockStore::create(path)?;
        store.reserve_superstructure();
        let root_block = store.allocate();
        debug_assert_eq!(root_block, DATA_REGION_START);
        store.write(root_block, &[0u8; BLOCK_SIZE])?;

        let mut inodes = vec![Inode::default(); INODE_COUNT];
        inodes[ROOT_INODE as usize].init(FileType::Directory, BLOCK_SIZE as u64, root_block);

        let mut fs = Self {
            store,
            inodes,
            fds: FdTable::new(),
        };
        fs.write_inode_table()?;
        Ok(fs)
    }

    /// Opens an existing backing file and loads its inode region.
    pub fn mount<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut store = BlockStore::open(path)?;
        let mut inodes = vec![Inode::default(); INODE_COUNT];
        let mut buf = [0u8; BLOCK_SIZE];
        for block in 0..(INODE_COUNT / INODES_PER_BLOCK) {
            store.read(INODE_REGION_START + block as u16, &mut buf)?;
            for slot in 0..INODES_PER_BLOCK {
                let off = slot * INODE_SIZE;
                let mut inode_buf = [0u8; INODE_SIZE];
                inode_buf.copy_from_slice(&buf[off..off + INODE_SIZE]);
                inodes[block * INODES_PER_BLOCK + slot] = Inode::from_bytes(&inode_buf);
            }
        }
        Ok(Self {
            store,
            inodes,
            fds: FdTable::new(),
        })
    }

    /// Writes the in-memory inode table back to disk, closes the block store, and drops the
    /// handle.
    pub fn unmount(mut self) -> Result<()> {
        self.write_inode_table()?;
        self.store.close()
    }

    fn write_inode_table(&mut self) -> Result<()> {
        let mut buf = [0u8; BLOCK_SIZE];
        for block in 0..(INODE_COUNT / INODES_PER_BLOCK) {
            for slot in 0..INODES_PER_BLOCK {
                let inode = &self.inodes[block * INODES_PER_BLOCK + slot];
                let off = slot * INODE_SIZE;
                buf[off..off + INODE_SIZE].copy_from_slice(&inode.to_bytes());
            }
            self.store.write(INODE_REGION_START + block as u16, &buf)?;
        }
        Ok(())
    }

    fn read_dir(&mut self, inode_index: u16) -> Result<DirBlock> {
        let inode = &self.inodes[inode_index as usize];
        if !inode.is_directory() {
            return Err(Error::WrongKind);
        }
        let mut buf = [0u8; BLOCK_SIZE];
        self.store.read(inode.direct[0], &mut buf)?;
        Ok(DirBlock::from_bytes(&buf))
    }

    fn write_dir(&mut self, inode_index: u16, block: &DirBlock) -> Result<()> {
        let block_id = self.inodes[inode_index as usize].direct[0];
        self.store.write(block_id, &block.to_bytes())
    }

    fn alloc_inode_slot(&self) -> Result<u16> {
        self.inodes
            .iter()
            .position(|i| !i.in_use())
            .map(|i| i as u16)
            .ok_or(Error::Exhausted)
    }

    fn validate_create_path(path_str: &str) -> Result<()> {
        if path_str.is_empty() || path_str.len() > MAX_PATH_LEN || path_str.ends_with('/') && path_str != "/" {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }

    /// Creates a regular file or directory at `path_str`. See module docs on directory and
    /// name-uniqueness rules.
    pub fn create(&mut self, path_str: &str, kind: FileType) -> Result<u16> {
        Self::validate_create_path(path_str)?;
        let tokens = path::parse(path_str)?;
        let (parent_tokens, name) = split_last(&tokens)?;
        let parent_index = resolve::resolve(&self.inodes, &mut self.store, parent_tokens)?;
        if !self.inodes[parent_index as usize].is_directory() {
            return Err(Error::WrongKind);
        }

        let new_index = self.alloc_inode_slot()?;
        let mut dir = self.read_dir(parent_index)?;
        if dir.find(name).is_some() {
            return Err(Error::NameConflict);
        }
        if dir.is_full() {
            return Err(Error::Exhausted);
        }

        let first_block = self.store.allocate();
        if first_block == 0 {
            return Err(Error::Exhausted);
        }
        let file_size = match kind {
            FileType::Regular => 0,
            FileType::Directory => {
                self.store.write(first_block, &[0u8; BLOCK_SIZE])?;
                BLOCK_SIZE as u64
            }
        };
        self.inodes[new_index as usize].init(kind, file_size, first_block);

        let record = Record::new(name, kind_byte(kind), new_index).ok_or(Error::InvalidArgument)?;
        dir.push(record);
        self.write_dir(parent_index, &dir)?;
        Ok(new_index)
    }

    /// Opens the regular file at `path_str` for byte-level I/O, returning a descriptor index.
    pub fn open(&mut self, path_str: &str) -> Result<usize> {
        let tokens = path::parse(path_str)?;
        let index = resolve::resolve(&self.inodes, &mut self.store, &tokens)?;
        if self.inodes[index as usize].is_directory() {
            return Err(Error::WrongKind);
        }
        self.fds.open(index)
    }

    pub fn close(&mut self, fd: usize) -> Result<()> {
        self.fds.close(fd)
    }

    pub fn seek(&mut self, fd: usize, offset: i64, whence: Whence) -> Result<u64> {
        let (inode_index, current) = self.fds.get(fd)?;
        let file_size = self.inodes[inode_index as usize].file_size;
        let new_offset = crate::fd::compute_seek(current, file_size, offset, whence);
        self.fds.set_offset(fd, new_offset)?;
        Ok(new_offset)
    }

    /// Reads up to `dst.len()` bytes starting at the descriptor's current offset, advancing
    /// it. Returns the number of bytes actually copied (0 at or past EOF).
    pub fn read(&mut self, fd: usize, dst: &mut [u8]) -> Result<usize> {
        if dst.is_empty() {
            return Ok(0);
        }
        let (inode_index, mut offset) = self.fds.get(fd)?;
        let file_size = self.inodes[inode_index as usize].file_size;
        let mut copied = 0usize;
        let mut buf = [0u8; BLOCK_SIZE];
        while copied < dst.len() && offset < file_size {
            let l = offset / BLOCK_SIZE as u64;
            let intra = (offset % BLOCK_SIZE as u64) as usize;
            let block_id = {
                let inode = &mut self.inodes[inode_index as usize];
                block_ptr::resolve(inode, &mut self.store, l, Mode::Read)?
            };
            if block_id == 0 {
                break;
            }
            self.store.read(block_id, &mut buf)?;
            let in_block = BLOCK_SIZE - intra;
            let remaining_file = (file_size - offset) as usize;
            let n = (dst.len() - copied).min(in_block).min(remaining_file);
            dst[copied..copied + n].copy_from_slice(&buf[intra..intra + n]);
            copied += n;
            offset += n as u64;
        }
        self.fds.set_offset(fd, offset)?;
        Ok(copied)
    }

    /// Appends `src` to the file's end, irrespective of the descriptor's current seek
    /// position (a preserved quirk, see the crate's design notes). Returns the number of
    /// bytes actually written; on exhaustion mid-write, already-written bytes remain intact.
    pub fn write(&mut self, fd: usize, src: &[u8]) -> Result<usize> {
        if src.is_empty() {
            return Ok(0);
        }
        let (inode_index, _) = self.fds.get(fd)?;
        let mut file_size = self.inodes[inode_index as usize].file_size;
        let mut written = 0usize;
        let mut buf = [0u8; BLOCK_SIZE];
        while written < src.len() {
            let l = file_size / BLOCK_SIZE as u64;
            let intra = (file_size % BLOCK_SIZE as u64) as usize;
            let block_id = {
                let inode = &mut self.inodes[inode_index as usize];
                match block_ptr::resolve(inode, &mut self.store, l, Mode::Write) {
                    Ok(id) => id,
                    Err(_) => break,
                }
            };
            let space = BLOCK_SIZE - intra;
            let n = (src.len() - written).min(space);
            if intra != 0 || n < BLOCK_SIZE {
                self.store.read(block_id, &mut buf)?;
                buf[intra..intra + n].copy_from_slice(&src[written..written + n]);
                self.store.write(block_id, &buf)?;
            } else {
                buf.copy_from_slice(&src[written..written + n]);
                self.store.write(block_id, &buf)?;
            }
            written += n;
            file_size += n as u64;
        }
        self.inodes[inode_index as usize].file_size = file_size;
        Ok(written)
    }

    /// Removes the regular file or empty directory at `path_str`.
    pub fn remove(&mut self, path_str: &str) -> Result<()> {
        let tokens = path::parse(path_str)?;
        if tokens.is_empty() {
            return Err(Error::InvalidArgument);
        }
        let (parent_tokens, name) = split_last(&tokens)?;
        let parent_index = resolve::resolve(&self.inodes, &mut self.store, parent_tokens)?;
        let mut dir = self.read_dir(parent_index)?;
        let idx = dir.find_index(name).ok_or(Error::NotFound)?;
        let target_index = dir.records()[idx].inode_index;
        let target = self.inodes[target_index as usize];

        if target.is_directory() {
            let target_dir = self.read_dir(target_index)?;
            if !target_dir.is_empty() {
                return Err(Error::NotEmpty);
            }
            self.store.release(target.direct[0]);
        } else {
            let logical_blocks = target.file_size.div_ceil(BLOCK_SIZE as u64);
            block_ptr::release_all(&target, &mut self.store, logical_blocks);
        }

        self.inodes[target_index as usize].clear();
        dir.swap_remove(idx);
        self.write_dir(parent_index, &dir)?;
        Ok(())
    }

    /// Moves the entry named by `src` to the name `dst`, both absolute, non-root paths.
    pub fn rename(&mut self, src: &str, dst: &str) -> Result<()> {
        if src == "/" || dst == "/" || src.ends_with('/') || dst.ends_with('/') {
            return Err(Error::InvalidArgument);
        }
        let src_tokens = path::parse(src)?;
        let dst_tokens = path::parse(dst)?;
        let (src_parent_tokens, src_name) = split_last(&src_tokens)?;
        let (dst_parent_tokens, dst_name) = split_last(&dst_tokens)?;

        if src_name == dst_parent_tokens.last().copied().unwrap_or_default() {
            return Err(Error::InvalidArgument);
        }

        let src_parent = resolve::resolve(&self.inodes, &mut self.store, src_parent_tokens)?;
        let dst_parent = resolve::resolve(&self.inodes, &mut self.store, dst_parent_tokens)?;

        let mut src_dir = self.read_dir(src_parent)?;
        let src_idx = src_dir.find_index(src_name).ok_or(Error::NotFound)?;

        let mut dst_dir = if dst_parent == src_parent {
            src_dir.clone()
        } else {
            self.read_dir(dst_parent)?
        };
        if dst_dir.find(dst_name).is_some() {
            return Err(Error::NameConflict);
        }
        if dst_dir.is_full() {
            return Err(Error::Exhausted);
        }

        let moved = src_dir.records()[src_idx];
        let new_record = Record::new(dst_name, moved.file_type, moved.inode_index)
            .ok_or(Error::InvalidArgument)?;

        if dst_parent == src_parent {
            src_dir.swap_remove(src_idx);
            src_dir.push(new_record);
            self.write_dir(src_parent, &src_dir)?;
        } else {
            dst_dir.push(new_record);
            src_dir.swap_remove(src_idx);
            self.write_dir(dst_parent, &dst_dir)?;
            self.write_dir(src_parent, &src_dir)?;
        }
        Ok(())
    }

    /// Lists the records of the directory named by `path_str` (including `/`).
    pub fn list(&mut self, path_str: &str) -> Result<Vec<(String, FileType, u16)>> {
        let tokens = path::parse(path_str)?;
        let index = resolve::resolve(&self.inodes, &mut self.store, &tokens)?;
        let dir = self.read_dir(index)?;
        Ok(dir
            .records()
            .iter()
            .map(|r| {
                let kind = if r.is_directory() {
                    FileType::Directory
                } else {
                    FileType::Regular
                };
                (r.name().to_string(), kind, r.inode_index)
            })
            .collect())
    }

    /// Byte length of the file or directory backing `fd`.
    pub fn file_size(&self, fd: usize) -> Result<u64> {
        let (inode_index, _) = self.fds.get(fd)?;
        Ok(self.inodes[inode_index as usize].file_size)
    }
}

fn kind_byte(kind: FileType) -> u8 {
    match kind {
        FileType::Regular => crate::inode::FILE_TYPE_REGULAR,
        FileType::Directory => crate::inode::FILE_TYPE_DIRECTORY,
    }
}
