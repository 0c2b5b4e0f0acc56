#![allow(dead_code)]

extern crate flatfs;
use flatfs::{BlockStore, FlatFSErrorConvertible, MountedFilesystem, BLOCK_SIZE, DATA_BLOCK_START};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, PartialEq)]
pub struct Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "memory store error")
    }
}

impl FlatFSErrorConvertible for Error {}

pub type Filesystem = MountedFilesystem<Error>;

/// An in-memory image. Clones share the same bytes so a test can keep a handle while the
/// filesystem owns the store.
#[derive(Clone)]
pub struct MemoryStore {
    pub disk: Rc<RefCell<Vec<u8>>>,
    writes: Rc<Cell<usize>>,
    fail_writes: Rc<Cell<bool>>,
    fail_metadata_writes: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new(disk_size: usize) -> Self {
        return Self {
            disk: Rc::new(RefCell::new(vec![0u8; disk_size])),
            writes: Rc::new(Cell::new(0)),
            fail_writes: Rc::new(Cell::new(false)),
            fail_metadata_writes: Rc::new(Cell::new(false)),
        };
    }

    pub fn dump_disk(&self) -> Vec<u8> {
        return self.disk.borrow().clone();
    }

    pub fn block(&self, index: u32) -> Vec<u8> {
        let start = index as usize * BLOCK_SIZE as usize;
        return self.disk.borrow()[start..start + BLOCK_SIZE as usize].to_vec();
    }

    /// The number of block writes so far.
    pub fn writes(&self) -> usize {
        return self.writes.get();
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Fails writes below the data region only, data blocks are still written.
    pub fn set_fail_metadata_writes(&self, fail: bool) {
        self.fail_metadata_writes.set(fail);
    }
}

impl BlockStore<Error> for MemoryStore {
    fn read_block(&self, index: u32) -> Result<Vec<u8>, Error> {
        let start = index as usize * BLOCK_SIZE as usize;
        let end = start + BLOCK_SIZE as usize;
        let disk = self.disk.borrow();

        if end > disk.len() {
            return Err(Error {});
        }

        return Ok(disk[start..end].to_vec());
    }

    fn write_block(&mut self, index: u32, block: &[u8]) -> Result<(), Error> {
        if self.fail_writes.get() || (self.fail_metadata_writes.get() && index < DATA_BLOCK_START)
        {
            return Err(Error {});
        }

        let start = index as usize * BLOCK_SIZE as usize;
        let mut disk = self.disk.borrow_mut();

        if start + block.len() > disk.len() {
            return Err(Error {});
        }

        disk[start..start + block.len()].copy_from_slice(block);
        self.writes.set(self.writes.get() + 1);

        return Ok(());
    }

    fn block_count(&self) -> Result<u32, Error> {
        return Ok((self.disk.borrow().len() / BLOCK_SIZE as usize) as u32);
    }
}

/// Formats a fresh in-memory image and returns the filesystem with a handle to its bytes.
pub fn new_filesystem(disk_size: usize) -> (Filesystem, MemoryStore) {
    let store = MemoryStore::new(disk_size);
    let fs = Filesystem::format(Box::new(store.clone())).unwrap();

    return (fs, store);
}

pub fn remount(store: &MemoryStore) -> Filesystem {
    return Filesystem::mount(Box::new(store.clone())).unwrap();
}

pub fn pattern(len: usize) -> Vec<u8> {
    return (0..len).map(|i| (i % 251) as u8).collect();
}
