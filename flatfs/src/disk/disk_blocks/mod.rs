mod inode;
mod super_block;

pub use inode::{INode, DIRECT_BLOCKS, INODE_SIZE, MAX_NAME_LENGTH, NAME_LENGTH};
pub use super_block::{
    SuperBlock, BITMAP_BLOCK_INDEX, BLOCK_SIZE, DATA_BLOCK_START, INODE_COUNT, INODE_TABLE_BLOCKS,
    INODE_TABLE_START, MAGIC, MAX_TOTAL_BLOCKS, SUPER_BLOCK_INDEX,
};
