//! Configuration type definitions
//!
//! String fields use fixed-capacity `heapless` strings. Values longer than a
//! field's capacity are truncated by [`bounded`].

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::defaults::DeviceDefaults;

/// Maximum Nightscout URL length
pub const MAX_URL_LEN: usize = 63;

/// Maximum API token length
pub const MAX_TOKEN_LEN: usize = 31;

/// Maximum Wi-Fi SSID or password length
pub const MAX_WLAN_FIELD_LEN: usize = 31;

/// Maximum BLE password length
pub const MAX_BLE_PASSWORD_LEN: usize = 63;

/// Number of Wi-Fi credential slots (`[wlan0]`..`[wlan9]`)
pub const WLAN_SLOTS: usize = 10;

/// Copy `value` into a string of capacity `N`
///
/// Truncates to at most `N` bytes, backing off to the previous character
/// boundary so multi-byte characters are never split.
pub fn bounded<const N: usize>(value: &str) -> String<N> {
    let mut end = value.len().min(N);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut s = String::new();
    // Cannot fail, end <= N
    let _ = s.push_str(&value[..end]);
    s
}

/// One Wi-Fi network slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WlanCredentials {
    /// Network name, empty if the slot is unused
    pub ssid: String<MAX_WLAN_FIELD_LEN>,
    /// Network password, empty for open networks or unused slots
    pub pass: String<MAX_WLAN_FIELD_LEN>,
}

impl WlanCredentials {
    /// Check if this slot names a network
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }
}

/// Device configuration loaded from `M5NS.INI`
///
/// Every field holds either the value from the file or its default; the
/// loader never hands out a partially filled record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Nightscout site URL (`[config] nightscout`)
    pub url: String<MAX_URL_LEN>,
    /// Nightscout API token, empty if not set
    pub token: String<MAX_TOKEN_LEN>,
    /// Time zone offset in seconds
    pub time_zone: i32,
    /// Daylight saving offset in seconds
    pub dst: i32,
    /// Non-zero to show mg/dL instead of mmol/L
    pub show_mgdl: i32,
    /// First brightness level (1-100)
    pub brightness1: u8,
    /// Second brightness level (1-100)
    pub brightness2: u8,
    /// Third brightness level (1-100)
    pub brightness3: u8,
    /// Wi-Fi networks, tried in slot order
    pub wlan: [WlanCredentials; WLAN_SLOTS],
    /// BLE pairing password, empty if not set
    pub ble_password: String<MAX_BLE_PASSWORD_LEN>,
}

impl DeviceConfig {
    /// Create a record for `url` with every optional field at its default
    pub fn new(url: String<MAX_URL_LEN>, defaults: &DeviceDefaults) -> Self {
        Self {
            url,
            token: String::new(),
            time_zone: defaults.time_zone,
            dst: defaults.dst,
            show_mgdl: defaults.show_mgdl,
            brightness1: defaults.brightness1,
            brightness2: defaults.brightness2,
            brightness3: defaults.brightness3,
            wlan: core::array::from_fn(|_| WlanCredentials::default()),
            ble_password: String::new(),
        }
    }

    /// Check if an API token is set
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    /// Check if a BLE password is set
    pub fn has_ble_password(&self) -> bool {
        !self.ble_password.is_empty()
    }

    /// Check if glucose values should be shown in mg/dL
    pub fn uses_mgdl(&self) -> bool {
        self.show_mgdl != 0
    }

    /// The three brightness levels, in order
    pub fn brightness_levels(&self) -> [u8; 3] {
        [self.brightness1, self.brightness2, self.brightness3]
    }

    /// Total UTC offset in seconds (time zone plus daylight saving)
    pub fn utc_offset(&self) -> i32 {
        self.time_zone.saturating_add(self.dst)
    }

    /// Configured Wi-Fi networks with their slot index
    pub fn configured_networks(&self) -> impl Iterator<Item = (usize, &WlanCredentials)> {
        self.wlan
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_configured())
    }
}
