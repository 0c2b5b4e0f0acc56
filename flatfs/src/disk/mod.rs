// Disk layout:
// block 0 super block, block 1 allocation bitmap (one byte per block),
// inode table (128 packed records), data blocks ...

mod block_map;
pub mod block_store;
mod disk_blocks;
mod disk_info;
mod filesystem;

pub use block_map::{BlockMap, BlockRole};
pub use block_store::BlockStore;
pub use disk_blocks::*;
pub use disk_info::{DiskInfo, FileEntry};
pub use filesystem::{MountedFilesystem, MAX_FILE_SIZE};
