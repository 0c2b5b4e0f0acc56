use super::{
    BlockMap, BlockRole, BlockStore, DiskInfo, FileEntry, INode, SuperBlock, BITMAP_BLOCK_INDEX,
    BLOCK_SIZE, DATA_BLOCK_START, DIRECT_BLOCKS, INODE_COUNT, MAX_NAME_LENGTH, MAX_TOTAL_BLOCKS,
    SUPER_BLOCK_INDEX,
};
use crate::bitmap::BlockAllocator;
use crate::inode_table::InodeTable;
use crate::{ByteSerializable, FlatFSError, FlatFSErrorConvertible};
use alloc::{boxed::Box, vec, vec::Vec};
use log::{debug, info, warn};

/// The largest file the direct block map can describe.
pub const MAX_FILE_SIZE: u32 = DIRECT_BLOCKS as u32 * BLOCK_SIZE;

/// A formatted or mounted image. Owns the block store and the in-memory metadata; every mutating
/// operation writes the metadata it changed back before returning.
pub struct MountedFilesystem<E: FlatFSErrorConvertible> {
    store: Box<dyn BlockStore<E>>,

    super_block: SuperBlock,
    allocator: BlockAllocator,
    inodes: InodeTable,
}

macro_rules! unwrap_store_error {
    ($v:expr) => {
        match $v {
            Ok(val) => val,
            Err(e) => return Err(e.into_flatfs_error()),
        }
    };
}

/// The number of blocks needed to hold `size` bytes.
fn blocks_for(size: u32) -> usize {
    return ((size as u64 + BLOCK_SIZE as u64 - 1) / BLOCK_SIZE as u64) as usize;
}

fn is_valid_name(name: &str) -> bool {
    return !name.is_empty()
        && name.len() <= MAX_NAME_LENGTH
        && !name.chars().any(|ch| ch.is_control());
}

impl<E: FlatFSErrorConvertible> MountedFilesystem<E> {
    /// Writes a new, empty filesystem over the whole store and returns it mounted.
    pub fn format(mut store: Box<dyn BlockStore<E>>) -> Result<Self, FlatFSError<E>> {
        let total_blocks = unwrap_store_error!(store.block_count());

        if total_blocks < DATA_BLOCK_START || total_blocks > MAX_TOTAL_BLOCKS {
            return Err(FlatFSError::InvalidImageSize);
        }

        let super_block = SuperBlock::new(total_blocks);

        let mut block = vec![0u8; BLOCK_SIZE as usize];
        block[..SuperBlock::size()].copy_from_slice(&super_block.to_bytes());
        unwrap_store_error!(store.write_block(SUPER_BLOCK_INDEX, &block));

        let mut new_disk = Self {
            store,
            super_block,
            allocator: BlockAllocator::new(super_block.data_block_start(), total_blocks),
            inodes: InodeTable::new(INODE_COUNT as usize),
        };

        new_disk.write_bitmap()?;
        new_disk.write_inode_table()?;

        info!(
            "formatted image: {} blocks, {} data blocks",
            total_blocks,
            super_block.data_block_count()
        );

        return Ok(new_disk);
    }

    /// Reads the superblock, the bitmap and the inode table of an existing image.
    pub fn mount(store: Box<dyn BlockStore<E>>) -> Result<Self, FlatFSError<E>> {
        let available_blocks = unwrap_store_error!(store.block_count());

        if available_blocks < DATA_BLOCK_START {
            return Err(FlatFSError::InvalidImage);
        }

        let bytes = Self::read_whole_block(&*store, SUPER_BLOCK_INDEX)?;

        let super_block = match SuperBlock::from_bytes(&bytes) {
            Some(s) => s,
            None => return Err(FlatFSError::InvalidImage),
        };

        if !super_block.has_valid_geometry() || super_block.total_blocks() > available_blocks {
            return Err(FlatFSError::InvalidImage);
        }

        let bitmap = Self::read_whole_block(&*store, BITMAP_BLOCK_INDEX)?;
        let allocator = BlockAllocator::from_bytes(
            &bitmap,
            super_block.data_block_start(),
            super_block.total_blocks(),
        );

        let mut table_bytes = Vec::new();

        for index in super_block.inode_table_start()..super_block.data_block_start() {
            table_bytes.extend(Self::read_whole_block(&*store, index)?);
        }

        let inodes = InodeTable::from_bytes(&table_bytes, super_block.inode_count() as usize);

        info!(
            "mounted image: {} blocks, {} files",
            super_block.total_blocks(),
            inodes.occupied().count()
        );

        return Ok(Self {
            store,
            super_block,
            allocator,
            inodes,
        });
    }

    /// Creates an empty file and reserves enough blocks to hold `size` bytes.
    pub fn create(&mut self, name: &str, size: u32) -> Result<(), FlatFSError<E>> {
        if !is_valid_name(name) {
            return Err(FlatFSError::InvalidFileName);
        }

        if self.inodes.find_by_name(name).is_some() {
            return Err(FlatFSError::FileExists);
        }

        let slot = match self.inodes.find_free_slot() {
            Some(slot) => slot,
            None => return Err(FlatFSError::NoFreeInode),
        };

        let blocks_needed = blocks_for(size);

        if blocks_needed > DIRECT_BLOCKS {
            return Err(FlatFSError::FileTooLarge);
        }

        let mut blocks = Vec::with_capacity(blocks_needed);

        for _ in 0..blocks_needed {
            match self.allocator.allocate() {
                Some(index) => blocks.push(index),
                None => {
                    for index in blocks {
                        self.allocator.release(index);
                    }

                    return Err(FlatFSError::NoFreeSpace);
                }
            }
        }

        self.inodes.occupy(slot, name, size);

        if let Some(node) = self.inodes.get_mut(slot) {
            for (position, index) in blocks.iter().enumerate() {
                node.set_block(position, *index);
            }
        }

        self.flush_or_undo(true, |fs| {
            if let Some(node) = fs.inodes.get_mut(slot) {
                node.clear();
            }

            fs.release_all(&blocks);
        })?;

        debug!(
            "created '{}' ({} bytes) in inode {} using blocks {:?}",
            name, size, slot, blocks
        );

        return Ok(());
    }

    /// Removes a file and frees its blocks.
    pub fn delete(&mut self, name: &str) -> Result<(), FlatFSError<E>> {
        let slot = self.find_slot(name)?;

        let previous = match self.inodes.get(slot) {
            Some(n) => *n,
            None => return Err(FlatFSError::FileNotFound),
        };
        let previous_allocator = self.allocator.clone();

        self.inodes.release(slot, &mut self.allocator);

        self.flush_or_undo(true, |fs| {
            if let Some(node) = fs.inodes.get_mut(slot) {
                *node = previous;
            }

            fs.allocator = previous_allocator;
        })?;

        debug!("deleted '{}' (inode {})", name, slot);

        return Ok(());
    }

    /// Replaces the contents of a file. Data beyond `MAX_FILE_SIZE` is dropped. Missing blocks
    /// are allocated first, blocks reserved at creation are kept. When the metadata cannot be
    /// flushed the size and block list stay as they were, the data blocks may already hold the
    /// new bytes.
    pub fn write(&mut self, name: &str, data: &[u8]) -> Result<(), FlatFSError<E>> {
        let slot = self.find_slot(name)?;

        let data = if data.len() > MAX_FILE_SIZE as usize {
            warn!(
                "write to '{}' truncated from {} to {} bytes",
                name,
                data.len(),
                MAX_FILE_SIZE
            );
            &data[..MAX_FILE_SIZE as usize]
        } else {
            data
        };

        let previous = match self.inodes.get(slot) {
            Some(n) => *n,
            None => return Err(FlatFSError::FileNotFound),
        };
        let mut node = previous;

        let mut grown = Vec::new();

        for position in 0..blocks_for(data.len() as u32) {
            if node.block_at(position).is_some() {
                continue;
            }

            match self.allocator.allocate() {
                Some(index) => {
                    node.set_block(position, index);
                    grown.push(index);
                }
                None => {
                    self.release_all(&grown);
                    return Err(FlatFSError::NoFreeSpace);
                }
            }
        }

        if let Err(e) = self.write_data(&node, data) {
            self.release_all(&grown);
            return Err(e);
        }

        node.set_file_size(data.len() as u32);

        if let Some(stored) = self.inodes.get_mut(slot) {
            *stored = node;
        }

        self.flush_or_undo(!grown.is_empty(), |fs| {
            if let Some(stored) = fs.inodes.get_mut(slot) {
                *stored = previous;
            }

            fs.release_all(&grown);
        })?;

        debug!(
            "wrote {} bytes to '{}', {} new blocks",
            data.len(),
            name,
            grown.len()
        );

        return Ok(());
    }

    /// Reads up to `max_size` bytes from the start of a file. Reading stops early at the first
    /// unallocated block.
    pub fn read(&self, name: &str, max_size: u32) -> Result<Vec<u8>, FlatFSError<E>> {
        let slot = self.find_slot(name)?;

        let node = match self.inodes.get(slot) {
            Some(n) => n,
            None => return Err(FlatFSError::FileNotFound),
        };

        let size = core::cmp::min(max_size, node.file_size()) as usize;
        let mut contents = Vec::with_capacity(size);

        for position in 0..DIRECT_BLOCKS {
            if contents.len() >= size {
                break;
            }

            let index = match node.block_at(position) {
                Some(index) => index,
                None => break,
            };

            let block = Self::read_whole_block(&*self.store, index)?;
            let to_read = core::cmp::min(BLOCK_SIZE as usize, size - contents.len());

            contents.extend_from_slice(&block[..to_read]);
        }

        debug!("read {} bytes from '{}'", contents.len(), name);

        return Ok(contents);
    }

    /// Every occupied inode in table order.
    pub fn list_occupied_inodes(&self) -> Vec<FileEntry> {
        return self
            .inodes
            .occupied()
            .map(|(slot, node)| FileEntry::from_inode(slot, node))
            .collect();
    }

    /// Metadata of a single file.
    pub fn stat(&self, name: &str) -> Result<FileEntry, FlatFSError<E>> {
        let slot = self.find_slot(name)?;

        return match self.inodes.get(slot) {
            Some(node) => Ok(FileEntry::from_inode(slot, node)),
            None => Err(FlatFSError::FileNotFound),
        };
    }

    /// Occupancy and role of every block on the image, taken from the in-memory bitmap.
    pub fn inspect_block_map(&self) -> BlockMap {
        let total_blocks = self.super_block.total_blocks();

        let occupancy = (0..total_blocks)
            .map(|index| self.allocator.is_used(index))
            .collect();

        let roles = (0..total_blocks)
            .map(|index| {
                BlockRole::classify(
                    index,
                    self.super_block.inode_table_start(),
                    self.super_block.data_block_start(),
                )
            })
            .collect();

        return BlockMap {
            total_blocks,
            block_size: self.super_block.block_size(),
            occupancy,
            roles,
        };
    }

    /// Totals for files, inode slots and blocks.
    pub fn disk_info(&self) -> DiskInfo {
        let files = self.inodes.len() - self.inodes.free_slots();

        return DiskInfo::new(
            files as u64,
            self.inodes.free_slots() as u64,
            self.super_block.block_size() as u64,
            self.super_block.total_blocks() as u64,
            self.super_block.data_block_count() as u64,
            self.allocator.free_count() as u64,
        );
    }

    #[inline]
    pub fn super_block(&self) -> &SuperBlock {
        return &self.super_block;
    }

    /// Ends the session and returns the block store.
    pub fn into_store(self) -> Box<dyn BlockStore<E>> {
        return self.store;
    }

    fn find_slot(&self, name: &str) -> Result<usize, FlatFSError<E>> {
        return match self.inodes.find_by_name(name) {
            Some(slot) => Ok(slot),
            None => Err(FlatFSError::FileNotFound),
        };
    }

    /// Writes the inode table, then the bitmap if asked. If a write fails, `undo` restores the
    /// in-memory metadata and the restored tables are written back as far as the store allows.
    fn flush_or_undo<F>(&mut self, flush_bitmap: bool, undo: F) -> Result<(), FlatFSError<E>>
    where
        F: FnOnce(&mut Self),
    {
        let mut result = self.write_inode_table();

        if result.is_ok() && flush_bitmap {
            result = self.write_bitmap();
        }

        if result.is_err() {
            undo(self);

            if self.write_inode_table().is_err() || (flush_bitmap && self.write_bitmap().is_err())
            {
                warn!("metadata on disk may be out of date after a failed flush");
            }
        }

        return result;
    }

    fn release_all(&mut self, blocks: &[u32]) {
        for index in blocks {
            self.allocator.release(*index);
        }
    }

    /// Writes `data` into the node's blocks in order, zero filling the tail of the last block.
    fn write_data(&mut self, node: &INode, data: &[u8]) -> Result<(), FlatFSError<E>> {
        for (position, chunk) in data.chunks(BLOCK_SIZE as usize).enumerate() {
            let index = match node.block_at(position) {
                Some(index) => index,
                None => break,
            };

            let mut block = vec![0u8; BLOCK_SIZE as usize];
            block[..chunk.len()].copy_from_slice(chunk);

            unwrap_store_error!(self.store.write_block(index, &block));
        }

        return Ok(());
    }

    fn read_whole_block(
        store: &dyn BlockStore<E>,
        index: u32,
    ) -> Result<Vec<u8>, FlatFSError<E>> {
        let bytes = unwrap_store_error!(store.read_block(index));

        if bytes.len() < BLOCK_SIZE as usize {
            return Err(FlatFSError::InvalidImage);
        }

        return Ok(bytes);
    }

    fn write_bitmap(&mut self) -> Result<(), FlatFSError<E>> {
        unwrap_store_error!(self
            .store
            .write_block(BITMAP_BLOCK_INDEX, self.allocator.as_bytes()));

        return Ok(());
    }

    /// Writes the whole inode table, padding the last block with zeros.
    fn write_inode_table(&mut self) -> Result<(), FlatFSError<E>> {
        let mut bytes = self.inodes.to_bytes();
        let start = self.super_block.inode_table_start();
        let blocks = self.super_block.data_block_start() - start;

        bytes.resize((blocks * BLOCK_SIZE) as usize, 0);

        for (i, chunk) in bytes.chunks(BLOCK_SIZE as usize).enumerate() {
            unwrap_store_error!(self.store.write_block(start + i as u32, chunk));
        }

        return Ok(());
    }
}
