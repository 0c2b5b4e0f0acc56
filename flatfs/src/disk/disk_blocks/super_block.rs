use super::inode::INODE_SIZE;
use crate::ByteSerializable;
use byteorder::{ByteOrder, LittleEndian};

pub const MAGIC: u32 = 0xDEAD_BEEF;
/// The size of every block in bytes. 4KiB.
pub const BLOCK_SIZE: u32 = 4_096;

pub const SUPER_BLOCK_INDEX: u32 = 0;
pub const BITMAP_BLOCK_INDEX: u32 = 1;
pub const INODE_TABLE_START: u32 = 2;
pub const INODE_COUNT: u32 = 128;
pub const INODE_TABLE_BLOCKS: u32 =
    (INODE_COUNT * INODE_SIZE as u32 + BLOCK_SIZE - 1) / BLOCK_SIZE;
/// First block that can hold file data. Everything before it is metadata.
pub const DATA_BLOCK_START: u32 = INODE_TABLE_START + INODE_TABLE_BLOCKS;
/// The bitmap is a single block holding one byte per block.
pub const MAX_TOTAL_BLOCKS: u32 = BLOCK_SIZE;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SuperBlock {
    /// Magic used to identify the filesystem
    magic: u32,
    block_size: u32,
    /// The number of whole blocks in the image.
    total_blocks: u32,
    inode_table_start: u32,
    inode_count: u32,
    data_block_start: u32,
}

impl SuperBlock {
    pub fn new(total_blocks: u32) -> Self {
        return Self {
            magic: MAGIC,
            block_size: BLOCK_SIZE,
            total_blocks,
            inode_table_start: INODE_TABLE_START,
            inode_count: INODE_COUNT,
            data_block_start: DATA_BLOCK_START,
        };
    }

    #[inline]
    pub fn magic(&self) -> u32 {
        return self.magic;
    }

    #[inline]
    pub fn block_size(&self) -> u32 {
        return self.block_size;
    }

    #[inline]
    pub fn total_blocks(&self) -> u32 {
        return self.total_blocks;
    }

    #[inline]
    pub fn inode_table_start(&self) -> u32 {
        return self.inode_table_start;
    }

    #[inline]
    pub fn inode_count(&self) -> u32 {
        return self.inode_count;
    }

    #[inline]
    pub fn data_block_start(&self) -> u32 {
        return self.data_block_start;
    }

    /// The number of blocks available for file data.
    pub fn data_block_count(&self) -> u32 {
        return self.total_blocks.saturating_sub(self.data_block_start);
    }

    /// Checks that the geometry matches the layout this implementation reads and writes.
    pub fn has_valid_geometry(&self) -> bool {
        return self.block_size == BLOCK_SIZE
            && self.inode_table_start == INODE_TABLE_START
            && self.inode_count == INODE_COUNT
            && self.data_block_start == DATA_BLOCK_START
            && self.total_blocks >= DATA_BLOCK_START
            && self.total_blocks <= MAX_TOTAL_BLOCKS;
    }

    /// The size of the serialized superblock, the rest of block 0 is zero.
    pub fn size() -> usize {
        return 24;
    }
}

impl ByteSerializable for SuperBlock {
    type BytesArrayType = [u8; 24];

    fn to_bytes(&self) -> Self::BytesArrayType {
        let mut bytes = [0u8; 24];

        LittleEndian::write_u32(&mut bytes[0..], self.magic);
        LittleEndian::write_u32(&mut bytes[4..], self.block_size);
        LittleEndian::write_u32(&mut bytes[8..], self.total_blocks);
        LittleEndian::write_u32(&mut bytes[12..], self.inode_table_start);
        LittleEndian::write_u32(&mut bytes[16..], self.inode_count);
        LittleEndian::write_u32(&mut bytes[20..], self.data_block_start);

        return bytes;
    }

    /// Fails on a short buffer or a magic mismatch. Geometry is checked separately.
    fn from_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: core::marker::Sized,
    {
        if bytes.len() < Self::size() {
            return None;
        }

        let res = Self {
            magic: LittleEndian::read_u32(&bytes[0..]),
            block_size: LittleEndian::read_u32(&bytes[4..]),
            total_blocks: LittleEndian::read_u32(&bytes[8..]),
            inode_table_start: LittleEndian::read_u32(&bytes[12..]),
            inode_count: LittleEndian::read_u32(&bytes[16..]),
            data_block_start: LittleEndian::read_u32(&bytes[20..]),
        };

        if res.magic != MAGIC {
            return None;
        }

        return Some(res);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        // 128 records of 109 bytes need four blocks.
        assert_eq!(INODE_TABLE_BLOCKS, 4);
        assert_eq!(DATA_BLOCK_START, 6);
        assert!(DATA_BLOCK_START > INODE_TABLE_START);
        assert!(
            (DATA_BLOCK_START - INODE_TABLE_START) * BLOCK_SIZE >= INODE_COUNT * INODE_SIZE as u32
        );
    }

    #[test]
    fn test_to_bytes() {
        let block = SuperBlock::new(256);

        let bytes = {
            let mut res = [0u8; 24];

            // Magic
            res[0] = 0xef;
            res[1] = 0xbe;
            res[2] = 0xad;
            res[3] = 0xde;

            // Block size
            res[5] = 0x10;

            // Total blocks
            res[9] = 0x01;

            res[12] = 2;
            res[16] = 128;
            res[20] = 6;

            res
        };

        assert_eq!(block.to_bytes(), bytes);
    }

    #[test]
    fn test_from_bytes() {
        let block = SuperBlock::new(256);

        assert_eq!(SuperBlock::from_bytes(&block.to_bytes()).unwrap(), block);
        assert!(block.has_valid_geometry());
        assert_eq!(block.data_block_count(), 250);
    }

    #[test]
    fn test_from_bytes_bad_magic() {
        let mut bytes = SuperBlock::new(256).to_bytes();
        bytes[0] = 0;

        assert!(SuperBlock::from_bytes(&bytes).is_none());
    }

    #[test]
    fn test_from_bytes_short() {
        let bytes = SuperBlock::new(256).to_bytes();

        assert!(SuperBlock::from_bytes(&bytes[..20]).is_none());
    }

    #[test]
    fn test_geometry_limits() {
        assert!(!SuperBlock::new(DATA_BLOCK_START - 1).has_valid_geometry());
        assert!(SuperBlock::new(DATA_BLOCK_START).has_valid_geometry());
        assert!(SuperBlock::new(MAX_TOTAL_BLOCKS).has_valid_geometry());
        assert!(!SuperBlock::new(MAX_TOTAL_BLOCKS + 1).has_valid_geometry());
    }
}
