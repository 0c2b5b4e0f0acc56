use crate::FlatFSErrorConvertible;
use alloc::vec::Vec;

/// Implementors provide fixed size block access to a physical disk, an image file or memory.
/// Every block is `BLOCK_SIZE` bytes and blocks are addressed by index, never by byte offset.
pub trait BlockStore<E: FlatFSErrorConvertible> {
    /// Read a whole block. If the resulting vector is shorter than a block the calling function
    /// will treat it as a short read.
    fn read_block(&self, index: u32) -> Result<Vec<u8>, E>;

    /// Write a whole block, `block` is always exactly one block long.
    fn write_block(&mut self, index: u32, block: &[u8]) -> Result<(), E>;

    /// The number of whole blocks held by the store. A trailing partial block is not counted.
    fn block_count(&self) -> Result<u32, E>;
}
