//! Hardware abstraction traits
//!
//! These traits define the interface between the configuration logic
//! and board-specific output devices.

pub mod display;

pub use display::{DisplayError, NullDisplay, StatusDisplay};
