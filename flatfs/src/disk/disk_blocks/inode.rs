use crate::ByteSerializable;
use alloc::string::String;
use alloc::vec::Vec;
use byteorder::{ByteOrder, LittleEndian};
use core::num::NonZeroU32;

/// Width of the on-disk name field, including the nul terminator.
pub const NAME_LENGTH: usize = 64;
pub const MAX_NAME_LENGTH: usize = NAME_LENGTH - 1;
/// A file maps at most this many blocks, there is no indirection.
pub const DIRECT_BLOCKS: usize = 10;
/// used flag, name, size, block indices. Packed, no padding.
pub const INODE_SIZE: usize = 1 + NAME_LENGTH + 4 + 4 * DIRECT_BLOCKS;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Metadata for one slot of the inode table.
pub struct INode {
    used: bool,
    /// name, nul terminated, zero filled after the terminator
    name: [u8; NAME_LENGTH],
    /// size in bytes
    size: u32,
    /// Direct map from logical block position to physical block. Block 0 is the superblock so it
    /// doubles as the "unallocated" marker on disk.
    blocks: [Option<NonZeroU32>; DIRECT_BLOCKS],
}

impl INode {
    /// An unoccupied slot.
    pub const fn empty() -> Self {
        return Self {
            used: false,
            name: [0u8; NAME_LENGTH],
            size: 0,
            blocks: [None; DIRECT_BLOCKS],
        };
    }

    /// Marks the slot used with a new name and size. The block list is cleared.
    pub fn occupy(&mut self, name: &str, size: u32) {
        *self = Self::empty();
        self.used = true;

        for (i, b) in name.bytes().take(MAX_NAME_LENGTH).enumerate() {
            self.name[i] = b;
        }

        self.size = size;
    }

    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    #[inline]
    pub fn is_used(&self) -> bool {
        return self.used;
    }

    #[inline]
    pub fn file_size(&self) -> u32 {
        return self.size;
    }

    pub fn set_file_size(&mut self, size: u32) {
        self.size = size;
    }

    fn name_bytes(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(NAME_LENGTH);

        return &self.name[..end];
    }

    pub fn name(&self) -> String {
        return String::from_utf8_lossy(self.name_bytes()).into_owned();
    }

    /// Exact comparison up to the nul terminator.
    pub fn has_name(&self, name: &str) -> bool {
        return self.name_bytes() == name.as_bytes();
    }

    /// The physical block at a logical position, None if nothing is allocated there.
    pub fn block_at(&self, position: usize) -> Option<u32> {
        return self
            .blocks
            .get(position)
            .and_then(|b| b.map(|index| index.get()));
    }

    /// Sets or clears the block at a logical position. Index 0 clears the slot.
    pub fn set_block(&mut self, position: usize, index: u32) {
        if position < DIRECT_BLOCKS {
            self.blocks[position] = NonZeroU32::new(index);
        }
    }

    /// Every allocated block in logical order.
    pub fn allocated_blocks(&self) -> Vec<u32> {
        return self
            .blocks
            .iter()
            .filter_map(|b| b.map(|index| index.get()))
            .collect();
    }

    pub fn allocated_block_count(&self) -> usize {
        return self.blocks.iter().filter(|b| b.is_some()).count();
    }
}

impl Default for INode {
    fn default() -> Self {
        return Self::empty();
    }
}

impl ByteSerializable for INode {
    type BytesArrayType = [u8; INODE_SIZE];

    fn to_bytes(&self) -> Self::BytesArrayType {
        let mut bytes = [0u8; INODE_SIZE];
        let mut offset = 0;

        bytes[offset] = self.used as u8;
        offset += 1;

        bytes[offset..offset + NAME_LENGTH].copy_from_slice(&self.name);
        offset += NAME_LENGTH;

        LittleEndian::write_u32(&mut bytes[offset..], self.size);
        offset += 4;

        for block in self.blocks.iter() {
            LittleEndian::write_u32(&mut bytes[offset..], block.map_or(0, |b| b.get()));
            offset += 4;
        }

        return bytes;
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < INODE_SIZE {
            return None;
        }

        let mut offset = 0;
        let mut res = Self::empty();

        res.used = bytes[offset] != 0;
        offset += 1;

        res.name.copy_from_slice(&bytes[offset..offset + NAME_LENGTH]);
        offset += NAME_LENGTH;

        res.size = LittleEndian::read_u32(&bytes[offset..]);
        offset += 4;

        for i in 0..DIRECT_BLOCKS {
            res.blocks[i] = NonZeroU32::new(LittleEndian::read_u32(&bytes[offset..]));
            offset += 4;
        }

        return Some(res);
    }
}
