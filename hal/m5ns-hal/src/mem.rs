//! In-memory file storage
//!
//! Serves files from byte slices. Used for host tests and for firmware
//! builds that compile a fallback configuration into the image.

use embedded_io::{ErrorKind, ErrorType, Read, Seek, SeekFrom};
use heapless::Vec;

use crate::storage::{check_path, FileStorage, StorageError};

/// A registered in-memory file
#[derive(Debug, Clone, Copy)]
struct MemEntry<'a> {
    path: &'a str,
    data: &'a [u8],
}

/// Storage backed by static byte slices
///
/// Holds up to `N` files. Paths are compared exactly.
#[derive(Debug, Default)]
pub struct MemStorage<'a, const N: usize = 4> {
    files: Vec<MemEntry<'a>, N>,
}

impl<'a, const N: usize> MemStorage<'a, N> {
    /// Create an empty storage
    pub const fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Register a file, replacing any previous file at the same path
    pub fn add(&mut self, path: &'a str, data: &'a [u8]) -> Result<(), StorageError> {
        check_path(path)?;

        if let Some(entry) = self.files.iter_mut().find(|e| e.path == path) {
            entry.data = data;
            return Ok(());
        }

        self.files
            .push(MemEntry { path, data })
            .map_err(|_| StorageError::Full)
    }

    /// Builder form of [`add`](Self::add)
    pub fn with_file(mut self, path: &'a str, data: &'a [u8]) -> Result<Self, StorageError> {
        self.add(path, data)?;
        Ok(self)
    }

    /// Number of registered files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if no files are registered
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<'a, const N: usize> FileStorage for MemStorage<'a, N> {
    type File = MemFile<'a>;

    fn open(&mut self, path: &str) -> Result<Self::File, StorageError> {
        check_path(path)?;
        self.files
            .iter()
            .find(|e| e.path == path)
            .map(|e| MemFile::new(e.data))
            .ok_or(StorageError::NotFound)
    }
}

/// Read-only cursor over an in-memory file
#[derive(Debug, Clone)]
pub struct MemFile<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MemFile<'a> {
    /// Create a cursor at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl ErrorType for MemFile<'_> {
    type Error = ErrorKind;
}

impl Read for MemFile<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.data.get(self.pos..).unwrap_or(&[]);
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl Seek for MemFile<'_> {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let target = match pos {
            SeekFrom::Start(offset) => i64::try_from(offset).map_err(|_| ErrorKind::InvalidInput)?,
            SeekFrom::End(offset) => self.data.len() as i64 + offset,
            SeekFrom::Current(offset) => self.pos as i64 + offset,
        };
        if target < 0 {
            return Err(ErrorKind::InvalidInput);
        }
        self.pos = target as usize;
        Ok(target as u64)
    }
}
