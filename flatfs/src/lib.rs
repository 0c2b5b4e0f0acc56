#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod bitmap;
mod byte_serializable;
mod disk;
mod flatfs_error;
mod inode_table;

pub use bitmap::BlockAllocator;
pub use byte_serializable::ByteSerializable;
pub use disk::*;
pub use flatfs_error::{FlatFSError, FlatFSErrorConvertible};
pub use inode_table::InodeTable;
