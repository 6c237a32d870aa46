//! INI file reading
//!
//! A streaming reader for `[section]` / `key=value` files. Only one line is
//! held in memory at a time, in a buffer supplied by the caller.

pub mod error;
pub mod reader;

pub use error::{describe, IniError};
pub use reader::IniFile;

/// Line buffer size used when loading the device configuration
///
/// One byte is reserved for the terminator, so lines may hold up to
/// `LINE_BUFFER_LEN - 1` bytes.
pub const LINE_BUFFER_LEN: usize = 80;
