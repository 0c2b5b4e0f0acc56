use crate::disk::BLOCK_SIZE;
use alloc::{vec, vec::Vec};
use log::debug;

const FREE: u8 = 0;
const USED: u8 = 1;

/// Block usage map, one byte per block. Blocks before `data_block_start` are metadata and are
/// never handed out or released.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct BlockAllocator {
    map: Vec<u8>,
    data_block_start: u32,
    total_blocks: u32,
}

impl BlockAllocator {
    /// Constructs a fresh map with only the metadata region marked used.
    pub fn new(data_block_start: u32, total_blocks: u32) -> Self {
        let mut map = vec![FREE; BLOCK_SIZE as usize];

        for entry in map.iter_mut().take(data_block_start as usize) {
            *entry = USED;
        }

        return Self {
            map,
            data_block_start,
            total_blocks: core::cmp::min(total_blocks, BLOCK_SIZE),
        };
    }

    /// Constructs the map from the bitmap block read off the disk.
    pub fn from_bytes(bytes: &[u8], data_block_start: u32, total_blocks: u32) -> Self {
        let mut map = vec![FREE; BLOCK_SIZE as usize];
        let length = core::cmp::min(bytes.len(), map.len());
        map[..length].copy_from_slice(&bytes[..length]);

        return Self {
            map,
            data_block_start,
            total_blocks: core::cmp::min(total_blocks, BLOCK_SIZE),
        };
    }

    /// First fit: marks and returns the lowest free data block.
    pub fn allocate(&mut self) -> Option<u32> {
        for index in self.data_block_start..self.total_blocks {
            if self.map[index as usize] == FREE {
                self.map[index as usize] = USED;
                debug!("allocated block {}", index);
                return Some(index);
            }
        }

        return None;
    }

    /// Marks a data block free. Metadata blocks and out of range indices are ignored.
    pub fn release(&mut self, index: u32) {
        if index >= self.data_block_start && index < self.total_blocks {
            self.map[index as usize] = FREE;
            debug!("released block {}", index);
        }
    }

    pub fn is_used(&self, index: u32) -> bool {
        return index < self.total_blocks && self.map[index as usize] != FREE;
    }

    pub fn free_count(&self) -> usize {
        return (self.data_block_start..self.total_blocks)
            .filter(|i| self.map[*i as usize] == FREE)
            .count();
    }

    /// The bitmap block as it is stored on disk.
    pub fn as_bytes(&self) -> &[u8] {
        return &self.map;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reserves_metadata() {
        let map = BlockAllocator::new(6, 256);

        for i in 0..6 {
            assert!(map.is_used(i));
        }

        for i in 6..256 {
            assert!(!map.is_used(i));
        }

        assert_eq!(map.free_count(), 250);
        assert_eq!(map.as_bytes().len(), BLOCK_SIZE as usize);
    }

    #[test]
    fn test_allocate_first_fit() {
        let mut map = BlockAllocator::new(6, 256);

        assert_eq!(map.allocate(), Some(6));
        assert_eq!(map.allocate(), Some(7));
        assert_eq!(map.allocate(), Some(8));

        map.release(7);

        assert_eq!(map.allocate(), Some(7));
        assert_eq!(map.allocate(), Some(9));
    }

    #[test]
    fn test_allocate_full() {
        let mut map = BlockAllocator::new(6, 8);

        assert_eq!(map.allocate(), Some(6));
        assert_eq!(map.allocate(), Some(7));
        assert!(map.allocate().is_none());
    }

    #[test]
    fn test_no_data_blocks() {
        let mut map = BlockAllocator::new(6, 6);

        assert!(map.allocate().is_none());
        assert_eq!(map.free_count(), 0);
    }

    #[test]
    fn test_release_ignores_metadata() {
        let mut map = BlockAllocator::new(6, 256);

        for i in 0..6 {
            map.release(i);
            assert!(map.is_used(i));
        }

        map.release(256);
        map.release(u32::MAX);
        assert_eq!(map.free_count(), 250);
    }

    #[test]
    fn test_from_bytes() {
        let mut map = BlockAllocator::new(6, 256);
        map.allocate();
        map.allocate();

        let loaded = BlockAllocator::from_bytes(map.as_bytes(), 6, 256);

        assert_eq!(loaded, map);
        assert!(loaded.is_used(7));
        assert!(!loaded.is_used(8));
    }

    #[test]
    fn test_bytes_layout() {
        let mut map = BlockAllocator::new(6, 256);
        map.allocate();

        let mut comp = vec![0u8; BLOCK_SIZE as usize];
        for i in 0..7 {
            comp[i] = 1;
        }

        assert_eq!(map.as_bytes().to_vec(), comp);
    }
}
