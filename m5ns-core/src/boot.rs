//! Boot-time configuration loading
//!
//! On the device a missing or broken configuration is not recoverable:
//! the error goes to the log and the status display, and the firmware
//! stops in [`halt`]. [`load_or_report`] does everything except the halt
//! so the reporting can be tested on the host.

use m5ns_hal::FileStorage;

use crate::config::{load_config, DeviceConfig, DeviceDefaults, LoadError};
use crate::traits::StatusDisplay;

/// Default configuration file path on the SD card
pub const CONFIG_PATH: &str = "/M5NS.INI";

/// Load the configuration, reporting a fatal error to `display`
pub fn load_or_report<S, D>(
    storage: &mut S,
    path: &str,
    defaults: &DeviceDefaults,
    display: &mut D,
) -> Result<DeviceConfig, LoadError>
where
    S: FileStorage,
    D: StatusDisplay,
{
    load_config(storage, path, defaults).map_err(|e| {
        error!("Configuration failed: {}", e.cause().as_str());
        if display.println(e.display_message()).is_err() {
            warn!("Status display unavailable");
        }
        e
    })
}

/// Load the configuration or stop the device
///
/// Never returns if the file is missing, invalid, or has no Nightscout URL.
pub fn load_or_halt<S, D>(
    storage: &mut S,
    path: &str,
    defaults: &DeviceDefaults,
    display: &mut D,
) -> DeviceConfig
where
    S: FileStorage,
    D: StatusDisplay,
{
    match load_or_report(storage, path, defaults, display) {
        Ok(config) => config,
        Err(_) => halt(),
    }
}

/// Stop forever
pub fn halt() -> ! {
    error!("Halted");
    loop {
        core::hint::spin_loop();
    }
}
