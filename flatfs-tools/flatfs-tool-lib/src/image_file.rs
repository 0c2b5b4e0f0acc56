use crate::error::ImageError;
use flatfs::{BlockStore, BLOCK_SIZE};
use std::cell::RefCell;
use std::convert::TryFrom;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};

/// A disk image on the host filesystem, accessed one block at a time.
pub struct ImageFile {
    file: RefCell<File>,
    read_only: bool,
}

impl ImageFile {
    /// This will create a new file of exactly the specified size, replacing any existing file.
    pub fn create(path: &str, size: u64) -> Result<Self, ImageError> {
        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
        {
            Ok(f) => f,
            Err(e) => {
                return Err(ImageError::new(&format!(
                    "Failed to create {}. Error: {}",
                    path, e
                )))
            }
        };

        // Extend the file up to the size
        match file.set_len(size) {
            Ok(_) => (),
            Err(e) => {
                return Err(ImageError::new(&format!(
                    "Failed to extend {} to {} bytes. Error: {}",
                    path, size, e
                )))
            }
        }

        return Ok(Self {
            file: RefCell::new(file),
            read_only: false,
        });
    }

    /// Opens an existing image for reading and writing.
    pub fn open(path: &str) -> Result<Self, ImageError> {
        let file = match OpenOptions::new().read(true).write(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                return Err(ImageError::new(&format!(
                    "Failed to open file {}. Error: {}",
                    path, e
                )))
            }
        };

        return Ok(Self {
            file: RefCell::new(file),
            read_only: false,
        });
    }

    /// Opens an existing image, every write will fail.
    pub fn open_read_only(path: &str) -> Result<Self, ImageError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                return Err(ImageError::new(&format!(
                    "Failed to open file {}. Error: {}",
                    path, e
                )))
            }
        };

        return Ok(Self {
            file: RefCell::new(file),
            read_only: true,
        });
    }

    /// The raw image size in bytes.
    pub fn image_size(&self) -> Result<u64, ImageError> {
        let b = self.file.borrow();
        let metadata = match b.metadata() {
            Ok(m) => m,
            Err(e) => {
                return Err(ImageError::new(&format!(
                    "Could not determine file size. Error: {}",
                    e
                )))
            }
        };

        return Ok(metadata.len());
    }

    fn seek_to_block(file: &mut File, index: u32) -> Result<(), ImageError> {
        let location = index as u64 * BLOCK_SIZE as u64;

        return match file.seek(SeekFrom::Start(location)) {
            Ok(_) => Ok(()),
            Err(e) => Err(ImageError::new(&format!(
                "Failed to seek to location: {}. Error: {}",
                location, e
            ))),
        };
    }
}

impl BlockStore<ImageError> for ImageFile {
    fn read_block(&self, index: u32) -> Result<Vec<u8>, ImageError> {
        if index >= self.block_count()? {
            return Err(ImageError::new(&format!(
                "Image is not large enough to read block: {}",
                index
            )));
        }

        let mut file = self.file.borrow_mut();
        Self::seek_to_block(&mut file, index)?;

        let mut result = vec![0u8; BLOCK_SIZE as usize];
        match file.read_exact(&mut result) {
            Ok(_) => (),
            Err(e) => {
                return Err(ImageError::new(&format!(
                    "Failed to read block {}. Error: {}",
                    index, e
                )))
            }
        }

        return Ok(result);
    }

    fn write_block(&mut self, index: u32, block: &[u8]) -> Result<(), ImageError> {
        if self.read_only {
            return Err(ImageError::new("The image was opened read only."));
        }

        if block.len() != BLOCK_SIZE as usize {
            return Err(ImageError::new(&format!(
                "Expected a block of {} bytes, got {}",
                BLOCK_SIZE,
                block.len()
            )));
        }

        if index >= self.block_count()? {
            return Err(ImageError::new(&format!(
                "Image is not large enough to write block: {}",
                index
            )));
        }

        let file = self.file.get_mut();
        Self::seek_to_block(file, index)?;

        match file.write_all(block) {
            Ok(_) => (),
            Err(e) => {
                return Err(ImageError::new(&format!(
                    "Failed to write block {}. Error: {}",
                    index, e
                )))
            }
        }

        return Ok(());
    }

    fn block_count(&self) -> Result<u32, ImageError> {
        let blocks = self.image_size()? / BLOCK_SIZE as u64;

        return Ok(u32::try_from(blocks).unwrap_or(u32::MAX));
    }
}
