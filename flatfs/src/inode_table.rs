use crate::bitmap::BlockAllocator;
use crate::disk::{INode, INODE_SIZE};
use crate::ByteSerializable;
use alloc::{vec, vec::Vec};

/// Fixed array of inode slots. The in-memory copy is authoritative while mounted.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InodeTable {
    inodes: Vec<INode>,
}

impl InodeTable {
    pub fn new(count: usize) -> Self {
        return Self {
            inodes: vec![INode::empty(); count],
        };
    }

    /// Loads `count` records from the raw inode table region. Missing records stay empty.
    pub fn from_bytes(bytes: &[u8], count: usize) -> Self {
        let mut table = Self::new(count);

        for (slot, record) in bytes.chunks_exact(INODE_SIZE).take(count).enumerate() {
            if let Some(node) = INode::from_bytes(record) {
                table.inodes[slot] = node;
            }
        }

        return table;
    }

    /// The table as consecutive packed records.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.inodes.len() * INODE_SIZE);

        for node in &self.inodes {
            bytes.extend_from_slice(&node.to_bytes());
        }

        return bytes;
    }

    /// First occupied slot with exactly this name.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        return self
            .inodes
            .iter()
            .position(|node| node.is_used() && node.has_name(name));
    }

    /// Lowest unoccupied slot.
    pub fn find_free_slot(&self) -> Option<usize> {
        return self.inodes.iter().position(|node| !node.is_used());
    }

    /// Marks a slot used. The caller has already checked the name and the size.
    pub fn occupy(&mut self, slot: usize, name: &str, size: u32) {
        if let Some(node) = self.inodes.get_mut(slot) {
            node.occupy(name, size);
        }
    }

    /// Frees every block the slot owns and returns it to the zero state.
    pub fn release(&mut self, slot: usize, allocator: &mut BlockAllocator) {
        if let Some(node) = self.inodes.get_mut(slot) {
            for block in node.allocated_blocks() {
                allocator.release(block);
            }

            node.clear();
        }
    }

    pub fn get(&self, slot: usize) -> Option<&INode> {
        return self.inodes.get(slot);
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut INode> {
        return self.inodes.get_mut(slot);
    }

    /// Occupied slots in table order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &INode)> {
        return self.inodes.iter().enumerate().filter(|(_, node)| node.is_used());
    }

    pub fn len(&self) -> usize {
        return self.inodes.len();
    }

    pub fn free_slots(&self) -> usize {
        return self.inodes.iter().filter(|node| !node.is_used()).count();
    }
}
