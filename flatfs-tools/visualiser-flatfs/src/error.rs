use flatfs::FlatFSError;
use flatfs_tool_lib::ImageError;

#[derive(Clone, Debug, PartialEq)]
pub struct VisualiserError {
    message: String,
    is_internal: bool,
}

impl VisualiserError {
    pub fn new(msg: &str) -> Self {
        return Self {
            message: msg.to_string(),
            is_internal: false,
        };
    }

    /// An error whose details only matter in the log.
    pub fn new_internal(msg: &str) -> Self {
        log::error!("{}", msg);

        return Self {
            message: msg.to_string(),
            is_internal: true,
        };
    }
}

impl std::fmt::Display for VisualiserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_internal {
            return write!(f, "An internal error occurred.");
        } else {
            return write!(f, "{}", self.message);
        }
    }
}

impl From<FlatFSError<ImageError>> for VisualiserError {
    fn from(e: FlatFSError<ImageError>) -> Self {
        return Self::new(&format!("Filesystem error: {}", e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            VisualiserError::new("No image file found").to_string(),
            "No image file found"
        );
        assert_eq!(
            VisualiserError::new_internal("tui exploded").to_string(),
            "An internal error occurred."
        );
    }

    #[test]
    fn test_from_filesystem_error() {
        let error: VisualiserError = FlatFSError::FileNotFound.into();
        assert_eq!(error.to_string(), "Filesystem error: FileNotFound");

        let error: VisualiserError = FlatFSError::IoError(ImageError::new("short read")).into();
        assert_eq!(error.to_string(), "Filesystem error: Disk error: short read");
    }
}
