//! The inode: 64 bytes of metadata per file or directory, serialized explicitly (never aliased
//! onto a native struct, since this format's layout is a wire format, not a Rust layout).

use crate::layout::DIRECT_POINTERS;

/// Size in bytes of one on-disk inode.
pub const INODE_SIZE: usize = 64;

/// `file_type` value for a regular file.
pub const FILE_TYPE_REGULAR: u8 = 0;
/// `file_type` value for a directory.
pub const FILE_TYPE_DIRECTORY: u8 = 1;

/// The kind of entry an inode describes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileType {
    Regular,
    Directory,
}

impl FileType {
    fn to_byte(self) -> u8 {
        match self {
            Self::Regular => FILE_TYPE_REGULAR,
            Self::Directory => FILE_TYPE_DIRECTORY,
        }
    }

    fn from_byte(b: u8) -> Option<Self> {
        match b {
            FILE_TYPE_REGULAR => Some(Self::Regular),
            FILE_TYPE_DIRECTORY => Some(Self::Directory),
            _ => None,
        }
    }
}

/// In-memory mirror of one on-disk inode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Inode {
    pub file_type: u8,
    pub use_flag: u8,
    pub file_size: u64,
    pub blocks_in_use: u32,
    pub direct: [u16; DIRECT_POINTERS],
    pub indirect: u16,
    pub double_indirect: u16,
}

impl Default for Inode {
    fn default() -> Self {
        Self {
            file_type: 0,
            use_flag: 0,
            file_size: 0,
            blocks_in_use: 0,
            direct: [0; DIRECT_POINTERS],
            indirect: 0,
            double_indirect: 0,
        }
    }
}

impl Inode {
    /// Whether this slot currently describes a live file or directory.
    pub fn in_use(&self) -> bool {
        self.use_flag != 0
    }

    /// The entry's kind, or `None` for a free slot (whose `file_type` byte is meaningless).
    pub fn kind(&self) -> Option<FileType> {
        self.in_use().then(|| FileType::from_byte(self.file_type)).flatten()
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind(), Some(FileType::Directory))
    }

    /// Resets every field to zero, matching the "free inode has all bytes zero" invariant.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Populates a freshly allocated inode for a new file or directory.
    pub fn init(&mut self, kind: FileType, file_size: u64, first_block: u16) {
        self.file_type = kind.to_byte();
        self.use_flag = 1;
        self.file_size = file_size;
        self.blocks_in_use = 1;
        self.direct = [0; DIRECT_POINTERS];
        self.direct[0] = first_block;
        self.indirect = 0;
        self.double_indirect = 0;
    }

    /// Serializes this inode to its fixed 64-byte on-disk form.
    pub fn to_bytes(&self) -> [u8; INODE_SIZE] {
        let mut buf = [0u8; INODE_SIZE];
        buf[0] = self.file_type;
        buf[1] = self.use_flag;
        buf[2..10].copy_from_slice(&self.file_size.to_le_bytes());
        buf[10..14].copy_from_slice(&self.blocks_in_use.to_le_bytes());
        // buf[14..35] stays zero padding.
        let mut off = 35;
        for id in self.direct {
            buf[off..off + 2].copy_from_slice(&id.to_le_bytes());
            off += 2;
        }
        buf[off..off + 2].copy_from_slice(&self.indirect.to_le_bytes());
        off += 2;
        buf[off..off + 2].copy_from_slice(&self.double_indirect.to_le_bytes());
        buf
    }

    /// Deserializes an inode from its fixed 64-byte on-disk form.
    pub fn from_bytes(buf: &[u8; INODE_SIZE]) -> Self {
        let file_size = u64::from_le_bytes(buf[2..10].try_into().unwrap());
        let blocks_in_use = u32::from_le_bytes(buf[10..14].try_into().unwrap());
        let mut off = 35;
        let mut direct = [0u16; DIRECT_POINTERS];
        for slot in &mut direct {
            *slot = u16::from_le_bytes(buf[off..off + 2].try_into().unwrap());
            off += 2;
        }
        let indirect = u16::from_le_bytes(buf[off..off + 2].try_into().unwrap());
        off += 2;
        let double_indirect = u16::from_le_bytes(buf[off..off + 2].try_into().unwrap());
        Self {
            file_type: buf[0],
            use_flag: buf[1],
            file_size,
            blocks_in_use,
            direct,
            indirect,
            double_indirect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let mut inode = Inode::default();
        inode.init(FileType::Directory, 512, 48);
        inode.indirect = 7;
        inode.double_indirect = 9;
        let bytes = inode.to_bytes();
        assert_eq!(bytes.len(), INODE_SIZE);
        let back = Inode::from_bytes(&bytes);
        assert_eq!(inode, back);
    }

    #[test]
    fn free_inode_is_all_zero() {
        let inode = Inode::default();
        assert_eq!(inode.to_bytes(), [0u8; INODE_SIZE]);
        assert!(!inode.in_use());
    }
}
