use thiserror::Error;

/// I/O errors that can occur when opening slide files
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// File exists but could not be read
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },
}

impl IoError {
    /// Map a `std::io::Error` raised while accessing `path`.
    pub fn from_std(path: &str, err: &std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            IoError::NotFound(path.to_string())
        } else {
            IoError::Read {
                path: path.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Errors raised by format drivers and the driver registry
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Pixel data could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// No registered driver can open the file
    #[error("Unsupported format: {reason}")]
    UnsupportedFormat { reason: String },

    /// Requested driver id is not registered
    #[error("Unknown driver: {0}")]
    UnknownDriver(String),

    /// A tile could not be produced for reasons other than missing data
    #[error("Invalid tile {index}: {message}")]
    InvalidTile { index: usize, message: String },
}

/// Errors returned by scene reads and tile composition
#[derive(Debug, Clone, Error)]
pub enum SlideError {
    /// Caller supplied an unusable rectangle, size, scale or channel index
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Operation is not supported by the scene's driver
    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    /// Failure inside the driver, propagated unmodified
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// A tile source reported self-contradictory data
    #[error("Invalid state: {message}")]
    InvalidState { message: String },
}

impl SlideError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        SlideError::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        SlideError::InvalidState {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(operation: impl Into<String>) -> Self {
        SlideError::UnsupportedOperation {
            operation: operation.into(),
        }
    }
}
