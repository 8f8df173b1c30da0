//! Fixed on-disk geometry.
//!
//! Everything here is a constant: this crate supports exactly one geometry, matching the
//! 16-bit block id / 64-byte inode design it was built against.

/// Size in bytes of a single block, on disk and in every in-memory buffer that mirrors one.
pub const BLOCK_SIZE: usize = 512;

/// Number of addressable block ids (`u16::MAX as usize + 1`). Id 0 is reserved as the
/// "unallocated" sentinel in every pointer slot, so only `BLOCK_COUNT - 1` blocks are ever
/// handed out by `allocate`.
pub const BLOCK_COUNT: usize = 1 << 16;

/// Number of blocks needed to hold one bit per block id (`BLOCK_COUNT` bits).
pub const BITMAP_BLOCKS: usize = (BLOCK_COUNT / 8) / BLOCK_SIZE;

/// First block id of the inode region.
pub const INODE_REGION_START: u16 = BITMAP_BLOCKS as u16;

/// Number of blocks making up the inode region.
pub const INODE_REGION_BLOCKS: usize = 32;

/// Number of inodes packed into a single inode-region block.
pub const INODES_PER_BLOCK: usize = BLOCK_SIZE / crate::inode::INODE_SIZE;

/// Total number of inodes.
pub const INODE_COUNT: usize = INODE_REGION_BLOCKS * INODES_PER_BLOCK;

/// First block id of the data region; the root directory is allocated here at format time.
pub const DATA_REGION_START: u16 = INODE_REGION_START + INODE_REGION_BLOCKS as u16;

/// Inode index of the root directory. Always in use, always a directory.
pub const ROOT_INODE: u16 = 0;

/// Number of block ids held by a single indirect index block.
pub const PTRS_PER_INDEX_BLOCK: usize = BLOCK_SIZE / 2;

/// Number of direct pointers stored inline in an inode.
pub const DIRECT_POINTERS: usize = 6;

/// First logical block index covered by the single-indirect pointer.
pub const INDIRECT_START: u64 = DIRECT_POINTERS as u64;

/// First logical block index covered by the double-indirect pointer.
pub const DOUBLE_INDIRECT_START: u64 = INDIRECT_START + PTRS_PER_INDEX_BLOCK as u64;

/// One past the last logical block index a file can ever address.
pub const MAX_LOGICAL_BLOCKS: u64 =
    DOUBLE_INDIRECT_START + (PTRS_PER_INDEX_BLOCK * PTRS_PER_INDEX_BLOCK) as u64;

/// Number of file records a single directory block can hold.
pub const RECORDS_PER_DIR_BLOCK: usize = 7;

/// Maximum number of bytes in a single path name component.
pub const MAX_NAME_LEN: usize = 63;

/// Maximum total length of a path accepted by namespace operations.
pub const MAX_PATH_LEN: usize = 100;

/// Number of file descriptors available per mount.
pub const FD_COUNT: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_constants_are_fixed() {
        assert_eq!(BITMAP_BLOCKS, 16);
        assert_eq!(INODE_REGION_START, 16);
        assert_eq!(INODES_PER_BLOCK, 8);
        assert_eq!(INODE_COUNT, 256);
        assert_eq!(DATA_REGION_START, 48);
        assert_eq!(MAX_LOGICAL_BLOCKS, 6 + 256 + 256 * 256);
    }
}
