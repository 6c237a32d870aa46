//! Host filesystem storage
//!
//! Backs [`FileStorage`] with `std::fs` so the loader can be exercised on a
//! development machine against real files.

use std::fs;
use std::io;
use std::path::PathBuf;

use embedded_io::{ErrorKind, ErrorType, Read, Seek, SeekFrom};

use crate::storage::{check_path, FileStorage, StorageError};

/// Storage rooted at a host directory
///
/// Device paths such as `/M5NS.INI` are resolved relative to the root.
#[derive(Debug, Clone)]
pub struct StdStorage {
    root: PathBuf,
}

impl StdStorage {
    /// Create a storage rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl FileStorage for StdStorage {
    type File = StdFile;

    fn open(&mut self, path: &str) -> Result<Self::File, StorageError> {
        check_path(path)?;
        match fs::File::open(self.resolve(path)) {
            Ok(file) => Ok(StdFile { inner: file }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(_) => Err(StorageError::NotOpen),
        }
    }
}

/// Open host file
#[derive(Debug)]
pub struct StdFile {
    inner: fs::File,
}

fn map_io_error(e: io::Error) -> ErrorKind {
    match e.kind() {
        io::ErrorKind::NotFound => ErrorKind::NotFound,
        io::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
        io::ErrorKind::Interrupted => ErrorKind::Interrupted,
        _ => ErrorKind::Other,
    }
}

impl ErrorType for StdFile {
    type Error = ErrorKind;
}

impl Read for StdFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        io::Read::read(&mut self.inner, buf).map_err(map_io_error)
    }
}

impl Seek for StdFile {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let pos = match pos {
            SeekFrom::Start(offset) => io::SeekFrom::Start(offset),
            SeekFrom::End(offset) => io::SeekFrom::End(offset),
            SeekFrom::Current(offset) => io::SeekFrom::Current(offset),
        };
        io::Seek::seek(&mut self.inner, pos).map_err(map_io_error)
    }
}
