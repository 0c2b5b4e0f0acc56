use core::fmt::{Debug, Display};

macro_rules! enum_variant_stringify {
    ($self:expr, [$($var:ident),+]) => {
        match $self {
            $(
               $var => stringify!($var),
            )+
            _ => "",
        }
    }
}

pub trait FlatFSErrorConvertible: Debug {
    /// Wraps a block store error so it can be returned from the filesystem.
    fn into_flatfs_error(self) -> FlatFSError<Self>
    where
        Self: Sized,
    {
        return FlatFSError::IoError(self);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatFSError<E> {
    /// The superblock could not be read or does not describe a flatfs image.
    InvalidImage,
    /// The image is too small for the metadata region or too large for the bitmap.
    InvalidImageSize,
    NoFreeInode,
    NoFreeSpace,
    /// The file would need more than the direct block limit.
    FileTooLarge,
    FileNotFound,
    FileExists,
    InvalidFileName,
    IoError(E),
}

impl<E: Display> core::fmt::Display for FlatFSError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use FlatFSError::*;

        match self {
            IoError(e) => write!(f, "Disk error: {}", e),
            _ => write!(
                f,
                "{}",
                enum_variant_stringify!(
                    self,
                    [
                        InvalidImage,
                        InvalidImageSize,
                        NoFreeInode,
                        NoFreeSpace,
                        FileTooLarge,
                        FileNotFound,
                        FileExists,
                        InvalidFileName
                    ]
                )
            ),
        }
    }
}
