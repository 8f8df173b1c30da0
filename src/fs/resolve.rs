//! Directory resolution: walks the tree from root, returning the inode of the entry named by
//! the *last* token of a path (a deliberate quirk, see module doc on [`resolve`]).

use crate::block_store::BlockStore;
use crate::dirent::DirBlock;
use crate::error::{Error, Result};
use crate::inode::Inode;
use crate::layout::ROOT_INODE;

fn read_dir_block(inode: &Inode, store: &mut BlockStore) -> Result<DirBlock> {
    let mut buf = [0u8; 512];
    store.read(inode.direct[0], &mut buf)?;
    Ok(DirBlock::from_bytes(&buf))
}

/// Walks `tokens` starting at the root directory and returns the inode index named by the
/// *last* token. Despite the name callers give this operation elsewhere, it is not strictly the
/// parent of the last token. An empty token sequence (the path `/`) returns the root inode.
///
/// Policy, checked per token in order:
/// - missing in the current directory → [`Error::NotFound`]
/// - found, is a file, but more tokens remain → [`Error::WrongKind`] (files cannot be
///   traversed through)
/// - found at the last token → return that entry's inode, whatever its kind
/// - found, is a directory, more tokens remain → descend
pub fn resolve(inodes: &[Inode], store: &mut BlockStore, tokens: &[&str]) -> Result<u16> {
    let mut current = ROOT_INODE;
    for (i, token) in tokens.iter().enumerate() {
        let dir_inode = &inodes[current as usize];
        let block = read_dir_block(dir_inode, store)?;
        let record = block.find(token).ok_or(Error::NotFound)?;
        let is_last = i == tokens.len() - 1;
        if !record.is_directory() && !is_last {
            return Err(Error::WrongKind);
        }
        current = record.inode_index;
    }
    Ok(current)
}

/// Splits `tokens` into the parent sequence (everything but the last) and the final name,
/// for operations (create, remove, move) that need to resolve the *enclosing* directory
/// separately from the leaf name being acted on.
pub fn split_last<'a>(tokens: &[&'a str]) -> Result<(&[&'a str], &'a str)> {
    match tokens.split_last() {
        Some((last, rest)) => Ok((rest, last)),
        None => Err(Error::InvalidArgument),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirent::Record;
    use crate::inode::FILE_TYPE_DIRECTORY;
    use crate::inode::FILE_TYPE_REGULAR;
    use crate::testutil::TempPath;

    fn fixture() -> (TempPath, BlockStore, Vec<Inode>) {
        let path = TempPath::new("resolve");
        let mut store = BlockStore::create(&path).unwrap();
        store.reserve_superstructure();
        let mut inodes = vec![Inode::default(); 256];
        let root_block_id = store.allocate();
        inodes[0].init(crate::inode::FileType::Directory, 512, root_block_id);

        let child_block_id = store.allocate();
        inodes[1].init(crate::inode::FileType::Directory, 512, child_block_id);
        let leaf_block_id = store.allocate();
        inodes[2].init(crate::inode::FileType::Regular, 0, leaf_block_id);

        let mut root_dir = DirBlock::new();
        root_dir.push(Record::new("d", FILE_TYPE_DIRECTORY, 1).unwrap());
        let mut buf = [0u8; 512];
        buf.copy_from_slice(&root_dir.to_bytes());
        store.write(root_block_id, &buf).unwrap();

        let mut child_dir = DirBlock::new();
        child_dir.push(Record::new("x", FILE_TYPE_REGULAR, 2).unwrap());
        let mut buf = [0u8; 512];
        buf.copy_from_slice(&child_dir.to_bytes());
        store.write(child_block_id, &buf).unwrap();

        (path, store, inodes)
    }

    #[test]
    fn empty_path_resolves_to_root() {
        let (_p, mut store, inodes) = fixture();
        assert_eq!(resolve(&inodes, &mut store, &[]).unwrap(), 0);
    }

    #[test]
    fn resolves_leaf_of_existing_path() {
        let (_p, mut store, inodes) = fixture();
        assert_eq!(resolve(&inodes, &mut store, &["d"]).unwrap(), 1);
        assert_eq!(resolve(&inodes, &mut store, &["d", "x"]).unwrap(), 2);
    }

    #[test]
    fn missing_token_is_not_found() {
        let (_p, mut store, inodes) = fixture();
        assert_eq!(
            resolve(&inodes, &mut store, &["missing"]).unwrap_err(),
            Error::NotFound
        );
    }

    #[test]
    fn traversing_through_a_file_is_wrong_kind() {
        let (_p, mut store, inodes) = fixture();
        assert_eq!(
            resolve(&inodes, &mut store, &["d", "x", "y"]).unwrap_err(),
            Error::WrongKind
        );
    }

    #[test]
    fn split_last_separates_parent_and_name() {
        let (rest, name) = split_last(&["d", "x"]).unwrap();
        assert_eq!(rest, &["d"]);
        assert_eq!(name, "x");
        assert_eq!(split_last(&[]).unwrap_err(), Error::InvalidArgument);
    }
}
