//! Device configuration
//!
//! The configuration record, its defaults, and the loader that fills it
//! from the INI file on local storage.

pub mod defaults;
pub mod loader;
pub mod types;

pub use defaults::*;
pub use loader::{load, load_config, parse_int, LoadError};
pub use types::*;
