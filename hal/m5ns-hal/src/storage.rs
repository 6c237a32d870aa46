//! File storage abstractions
//!
//! Provides the trait for opening files by path on local storage. The
//! returned handles are plain `embedded_io` readers, so the INI reader can
//! stream the file one line at a time without knowing the medium.

use core::fmt;

use embedded_io::{Read, Seek};

/// Maximum length of a storage path, in bytes
pub const MAX_PATH_LEN: usize = 64;

/// Errors from file storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No file exists at the path
    NotFound,
    /// The file exists but could not be opened
    NotOpen,
    /// Path is empty or longer than [`MAX_PATH_LEN`]
    InvalidPath,
    /// Storage is full (in-memory storage only)
    Full,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound => f.write_str("file not found"),
            StorageError::NotOpen => f.write_str("file not open"),
            StorageError::InvalidPath => f.write_str("invalid path"),
            StorageError::Full => f.write_str("storage full"),
        }
    }
}

/// Check a path against the storage path rules
pub fn check_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty() || path.len() > MAX_PATH_LEN {
        return Err(StorageError::InvalidPath);
    }
    Ok(())
}

/// File storage trait
///
/// Implemented by board support code on top of the SD card or flash
/// filesystem driver. Files are opened read-only.
pub trait FileStorage {
    /// Handle to an open file
    type File: Read + Seek;

    /// Open the file at `path` for reading
    ///
    /// # Returns
    /// The open file handle, or [`StorageError::NotFound`] if nothing
    /// exists at the path.
    fn open(&mut self, path: &str) -> Result<Self::File, StorageError>;

    /// Check if a file exists at `path`
    fn exists(&mut self, path: &str) -> bool {
        self.open(path).is_ok()
    }
}
