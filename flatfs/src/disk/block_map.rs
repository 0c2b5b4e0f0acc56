use crate::disk::{BITMAP_BLOCK_INDEX, SUPER_BLOCK_INDEX};
use alloc::vec::Vec;

/// What a block is used for, derived from the layout alone.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlockRole {
    SuperBlock,
    Bitmap,
    InodeTable,
    Data,
}

impl BlockRole {
    pub fn classify(index: u32, inode_table_start: u32, data_block_start: u32) -> Self {
        if index == SUPER_BLOCK_INDEX {
            return BlockRole::SuperBlock;
        } else if index == BITMAP_BLOCK_INDEX {
            return BlockRole::Bitmap;
        } else if index >= inode_table_start && index < data_block_start {
            return BlockRole::InodeTable;
        } else {
            return BlockRole::Data;
        }
    }
}

/// Snapshot of every block's occupancy and role, used by the visualiser.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockMap {
    pub total_blocks: u32,
    pub block_size: u32,
    pub occupancy: Vec<bool>,
    pub roles: Vec<BlockRole>,
}

impl BlockMap {
    pub fn used_count(&self) -> usize {
        return self.occupancy.iter().filter(|used| **used).count();
    }
}
