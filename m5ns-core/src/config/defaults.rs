//! Device defaults
//!
//! Values applied when the INI file leaves an optional key out. Passed into
//! the loader so builds for other regions can change them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default time zone offset (Central Europe, seconds)
pub const DEFAULT_TIME_ZONE: i32 = 3600;

/// Default daylight saving offset (summer time, seconds)
pub const DEFAULT_DST: i32 = 3600;

/// Default unit flag (0 = mmol/L)
pub const DEFAULT_SHOW_MGDL: i32 = 0;

/// Default brightness levels
pub const DEFAULT_BRIGHTNESS1: u8 = 50;
pub const DEFAULT_BRIGHTNESS2: u8 = 100;
pub const DEFAULT_BRIGHTNESS3: u8 = 10;

/// Lowest accepted brightness
pub const BRIGHTNESS_MIN: i32 = 1;

/// Highest accepted brightness
pub const BRIGHTNESS_MAX: i32 = 100;

/// Defaults for optional configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceDefaults {
    /// Time zone offset in seconds
    pub time_zone: i32,
    /// Daylight saving offset in seconds
    pub dst: i32,
    /// Unit flag
    pub show_mgdl: i32,
    /// Used when `brightness1` is missing or out of range
    pub brightness1: u8,
    /// Used when `brightness2` is missing or out of range
    pub brightness2: u8,
    /// Used when `brightness3` is missing or out of range
    pub brightness3: u8,
}

impl DeviceDefaults {
    /// The stock device defaults
    pub const fn new() -> Self {
        Self {
            time_zone: DEFAULT_TIME_ZONE,
            dst: DEFAULT_DST,
            show_mgdl: DEFAULT_SHOW_MGDL,
            brightness1: DEFAULT_BRIGHTNESS1,
            brightness2: DEFAULT_BRIGHTNESS2,
            brightness3: DEFAULT_BRIGHTNESS3,
        }
    }
}

impl Default for DeviceDefaults {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if `value` is an accepted brightness level
pub fn is_valid_brightness(value: i32) -> bool {
    (BRIGHTNESS_MIN..=BRIGHTNESS_MAX).contains(&value)
}
