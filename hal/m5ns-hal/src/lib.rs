//! M5NS Hardware Abstraction Layer
//!
//! This crate defines the storage traits the configuration loader reads
//! through. A board support crate implements [`FileStorage`] on top of its
//! SD card or SPIFFS driver; the application code only sees paths and
//! `embedded_io` file handles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  m5ns-core (config loader, INI reader)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  m5ns-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  MemStorage   │       │  StdStorage   │
//! │  (no_std)     │       │  (std, host)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`storage::FileStorage`] - Open files by path on local storage

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

pub mod mem;
pub mod storage;

#[cfg(feature = "std")]
pub mod host;

pub use mem::{MemFile, MemStorage};
pub use storage::{FileStorage, StorageError, MAX_PATH_LEN};

#[cfg(feature = "std")]
pub use host::{StdFile, StdStorage};
