//! INI reader errors

use core::fmt;

use m5ns_hal::StorageError;

/// Errors reported by [`IniFile`](super::IniFile)
///
/// The absence of an error is `None` from
/// [`IniFile::error`](super::IniFile::error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IniError {
    /// No file at the requested path
    FileNotFound,
    /// The file exists but could not be opened or read
    FileNotOpen,
    /// A line does not fit the caller's buffer
    BufferTooSmall,
    /// Seeking to a line start failed
    SeekError,
    /// The requested section does not exist
    SectionNotFound,
    /// The section exists but does not contain the key
    KeyNotFound,
    /// No more lines
    EndOfFile,
    /// Anything else, including values that are not valid UTF-8
    Unknown,
}

impl IniError {
    /// Short human-readable description
    pub const fn as_str(self) -> &'static str {
        match self {
            IniError::FileNotFound => "file not found",
            IniError::FileNotOpen => "file not open",
            IniError::BufferTooSmall => "buffer too small",
            IniError::SeekError => "seek error",
            IniError::SectionNotFound => "section not found",
            IniError::KeyNotFound => "key not found",
            IniError::EndOfFile => "end of file",
            IniError::Unknown => "unknown error",
        }
    }
}

impl fmt::Display for IniError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<StorageError> for IniError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound | StorageError::InvalidPath => IniError::FileNotFound,
            StorageError::NotOpen | StorageError::Full => IniError::FileNotOpen,
        }
    }
}

/// Describe the last reader error, `"no error"` if there was none
pub const fn describe(error: Option<IniError>) -> &'static str {
    match error {
        Some(e) => e.as_str(),
        None => "no error",
    }
}
