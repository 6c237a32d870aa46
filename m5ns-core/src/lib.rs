//! Board-agnostic configuration loading for the M5NS glucose display
//!
//! This crate turns the `M5NS.INI` file on the device's local storage into
//! a fully populated [`config::DeviceConfig`]:
//!
//! - Streaming INI reader over any `embedded_io` file handle
//! - Device configuration record with bounded strings
//! - Loader applying per-key defaults and brightness clamps
//! - Boot path that reports fatal errors and halts
//!
//! Everything except [`boot::halt`] returns errors to the caller, so the
//! whole loading path runs in host tests.

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[macro_use]
mod fmt;

pub mod boot;
pub mod config;
pub mod ini;
pub mod traits;
