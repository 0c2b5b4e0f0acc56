use crate::disk::INode;
use alloc::string::String;
use alloc::vec::Vec;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DiskInfo {
    number_of_files: u64,
    free_file_slots: u64,
    block_size: u64,
    total_blocks: u64,
    data_block_count: u64,
    free_block_count: u64,
}

impl DiskInfo {
    pub fn new(
        number_of_files: u64,
        free_file_slots: u64,
        block_size: u64,
        total_blocks: u64,
        data_block_count: u64,
        free_block_count: u64,
    ) -> Self {
        return Self {
            number_of_files,
            free_file_slots,
            block_size,
            total_blocks,
            data_block_count,
            free_block_count,
        };
    }

    #[inline]
    pub fn number_of_files(&self) -> u64 {
        return self.number_of_files;
    }

    #[inline]
    pub fn free_file_slots(&self) -> u64 {
        return self.free_file_slots;
    }

    #[inline]
    pub fn block_size(&self) -> u64 {
        return self.block_size;
    }

    #[inline]
    pub fn total_blocks(&self) -> u64 {
        return self.total_blocks;
    }

    #[inline]
    pub fn data_block_count(&self) -> u64 {
        return self.data_block_count;
    }

    #[inline]
    pub fn free_block_count(&self) -> u64 {
        return self.free_block_count;
    }

    /// Free data space in bytes.
    #[inline]
    pub fn free_block_space(&self) -> u64 {
        return self.free_block_count * self.block_size;
    }
}

/// A read-only view of one occupied inode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileEntry {
    pub slot: usize,
    pub name: String,
    pub size: u32,
    /// Physical blocks in logical order.
    pub blocks: Vec<u32>,
}

impl FileEntry {
    pub fn from_inode(slot: usize, node: &INode) -> Self {
        return Self {
            slot,
            name: node.name(),
            size: node.file_size(),
            blocks: node.allocated_blocks(),
        };
    }
}
