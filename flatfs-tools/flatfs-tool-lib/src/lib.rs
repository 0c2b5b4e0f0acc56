mod error;
mod image_file;

pub use error::ImageError;
pub use image_file::ImageFile;

use byte_unit::Byte;
use flatfs::{FlatFSError, MountedFilesystem, BLOCK_SIZE, DATA_BLOCK_START, MAX_TOTAL_BLOCKS};
use log::info;

/// A filesystem backed by an image file on the host.
pub type ImageFilesystem = MountedFilesystem<ImageError>;

/// Creates an image of exactly `size` bytes at `path` and formats it. The size is checked
/// before anything at `path` is touched.
pub fn format_image(path: &str, size: u64) -> Result<ImageFilesystem, FlatFSError<ImageError>> {
    let blocks = size / BLOCK_SIZE as u64;

    if blocks < DATA_BLOCK_START as u64 || blocks > MAX_TOTAL_BLOCKS as u64 {
        return Err(FlatFSError::InvalidImageSize);
    }

    let image = match ImageFile::create(path, size) {
        Ok(i) => i,
        Err(e) => return Err(FlatFSError::IoError(e)),
    };

    let fs = ImageFilesystem::format(Box::new(image))?;
    info!("formatted {} ({} bytes)", path, size);

    return Ok(fs);
}

/// Opens and mounts an existing image.
pub fn mount_image(path: &str) -> Result<ImageFilesystem, FlatFSError<ImageError>> {
    let image = match ImageFile::open(path) {
        Ok(i) => i,
        Err(e) => return Err(FlatFSError::IoError(e)),
    };

    return ImageFilesystem::mount(Box::new(image));
}

/// Mounts an image without ever writing to it.
pub fn mount_image_read_only(path: &str) -> Result<ImageFilesystem, FlatFSError<ImageError>> {
    let image = match ImageFile::open_read_only(path) {
        Ok(i) => i,
        Err(e) => return Err(FlatFSError::IoError(e)),
    };

    return ImageFilesystem::mount(Box::new(image));
}

pub fn sized_string_to_u64(string: &str) -> Option<u64> {
    return match Byte::from_str(string) {
        Ok(b) => Some(b.get_bytes() as u64),
        Err(_) => None,
    };
}

pub fn u64_to_sized_string(n: u64) -> String {
    return Byte::from(n).get_appropriate_unit(true).to_string();
}
